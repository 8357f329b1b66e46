//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量编译和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量考试处理器
//! - 管理应用生命周期（初始化、运行）
//! - 加载题库和考试清单（Vec<ExamList>）
//! - 决定正式编译还是测试编译
//! - 输出全局统计信息
//!
//! ### `exam_assembler` - 单个考试编译器
//! - 遍历单个考试的所有题目
//! - 创建并复用 QuestionFlow
//! - 计算汇总指标、选择文件名并写入
//! - 输出单个考试的统计信息
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<ExamList>)
//!     ↓
//! exam_assembler (处理一个考试的题目清单)
//!     ↓
//! workflow::QuestionFlow (处理单个 Question)
//!     ↓
//! services (能力层：placeholder / encoder / dataset / report)
//!     ↓
//! infrastructure (基础设施：题库、素材、随机变量、考试记录)
//! ```

pub mod batch_processor;
pub mod exam_assembler;

// 重新导出主要类型
pub use batch_processor::{load_exam_lists, App, ExamList};
pub use exam_assembler::{versioned_path, Compilation, ExamAssembler, QuestionStats};
