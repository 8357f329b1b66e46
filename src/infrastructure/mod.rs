//! 基础设施层（Infrastructure）
//!
//! 持有外部资源（文件系统、题库、随机变量），只暴露能力，不认识题型和考试流程。

pub mod asset_store;
pub mod exam_store;
pub mod random_vars;
pub mod repository;

pub use asset_store::{media_subtype, AssetStore, FsAssetStore};
pub use exam_store::{ExamStore, JsonExamStore};
pub use random_vars::{JsonVariableProvider, RandomVariableProvider, VariableSet};
pub use repository::{MemoryRepository, QuestionRepository};
