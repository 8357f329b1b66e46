//! # Exam Quiz Export
//!
//! 把题库中的题目编译成可导入 Moodle 的 XML 测验文件，并记录每个考试的汇总指标
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有外部资源，只暴露能力
//! - `QuestionRepository` - 只读题库
//! - `AssetStore` - 图片素材读取
//! - `RandomVariableProvider` - 计算题随机变量
//! - `ExamStore` - 考试记录（只写一次）
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个 Question
//! - `PlaceholderResolver` - 表格 / 图片 / 空位占位符
//! - `QuestionEncoder` - 八种题型的 `<question>` 编码
//! - `dataset` - 计算题数据集和小数位数
//! - `ReportWriter` - 写 warn.txt 能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一道题"的完整处理流程
//! - `QuestionCtx` - 上下文封装（考试 + 位置 + 题目名称）
//! - `QuestionFlow` - 流程编排（查找 → 编码 → 分类结果）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量考试处理器，管理资源和考试记录
//! - `orchestrator/exam_assembler` - 单个考试编译器，遍历题目清单并写入文件
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;
pub mod xml;

// 重新导出常用类型
pub use config::{Config, EncoderOptions};
pub use error::{AppError, AppResult, EncodeError};
pub use models::{CompileReport, Exam, ExamSummary, Issue, IssueKind, Question, QuestionKind};
pub use orchestrator::{App, Compilation, ExamAssembler};
pub use services::{count_decimals, PlaceholderResolver, QuestionEncoder};
pub use workflow::{ProcessResult, QuestionCtx, QuestionFlow};
