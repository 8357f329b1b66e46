//! 问题报告写入服务 - 业务能力层
//!
//! 只负责"追加写 warn.txt"能力，不关心流程

use crate::error::{AppError, AppResult};
use crate::models::report::CompileReport;
use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

/// 问题报告写入服务
///
/// 每次编译追加一段：考试名称 + 时间戳，然后每个问题题目一行。
pub struct ReportWriter {
    report_file_path: String,
}

impl ReportWriter {
    pub fn new() -> Self {
        Self {
            report_file_path: "warn.txt".to_string(),
        }
    }

    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            report_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.report_file_path
    }

    /// 追加一次编译的报告；报告为空时不写文件
    pub fn write(&self, exam_name: &str, report: &CompileReport) -> AppResult<()> {
        if report.is_empty() {
            return Ok(());
        }

        debug!(
            "写入报告: 考试 {} | 问题题目 {} 个 | 文件 {}",
            exam_name,
            report.len(),
            self.report_file_path
        );

        let mut content = format!(
            "考试 {} | {}\n",
            exam_name,
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        for issue in &report.issues {
            content.push_str(&format!("  {}\n", issue));
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.report_file_path)
            .map_err(|e| AppError::write_failed(&self.report_file_path, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| AppError::write_failed(&self.report_file_path, e))?;

        Ok(())
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}
