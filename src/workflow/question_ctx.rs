//! 题目处理上下文
//!
//! 封装"我正在处理哪个考试的第几题"这一信息

use std::fmt::Display;

/// 题目处理上下文
#[derive(Debug, Clone)]
pub struct QuestionCtx {
    /// 考试名称
    pub exam_name: String,

    /// 题目在清单中的位置（从1开始）
    pub position: usize,

    /// 清单中的题目总数（仅用于日志显示）
    pub total: usize,

    /// 题目名称
    pub name: String,
}

impl QuestionCtx {
    pub fn new(exam_name: String, position: usize, total: usize, name: String) -> Self {
        Self {
            exam_name,
            position,
            total,
            name,
        }
    }
}

impl Display for QuestionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[考试 {} 题目#{}/{} {}]",
            self.exam_name, self.position, self.total, self.name
        )
    }
}
