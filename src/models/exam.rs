use crate::models::question::Question;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 考试汇总指标
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExamSummary {
    /// 预计总用时（分钟）
    pub time_est: u32,
    /// 平均难度（保留两位小数）
    pub difficulty_avg: f64,
    /// 满分
    pub points_max: u32,
}

impl ExamSummary {
    /// 根据题目计算汇总指标；没有题目时全部为 0
    pub fn from_questions<'a>(questions: impl IntoIterator<Item = &'a Question>) -> Self {
        let mut count = 0usize;
        let mut difficulty_sum = 0f64;
        let mut summary = Self::default();

        for question in questions {
            count += 1;
            difficulty_sum += f64::from(question.difficulty);
            summary.time_est = summary.time_est.saturating_add(question.time_est);
            summary.points_max = summary.points_max.saturating_add(question.points);
        }

        if count > 0 {
            summary.difficulty_avg = round2(difficulty_sum / count as f64);
        }
        summary
    }

    /// 写在导出文件开头的注释内容
    pub fn header_comment(&self) -> String {
        format!(
            "Estimated time: {}, average difficulty: {}, maximum possible points: {}",
            self.time_est,
            format_difficulty(self.difficulty_avg),
            self.points_max
        )
    }
}

impl fmt::Display for ExamSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "满分 {} | 平均难度 {} | 预计用时 {} 分钟",
            self.points_max,
            format_difficulty(self.difficulty_avg),
            self.time_est
        )
    }
}

/// 考试记录，编译成功后创建一次
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    pub name: String,
    /// 实际写入导出文件的题目（按顺序）
    pub questions: Vec<String>,
    pub time_est: u32,
    pub difficulty_avg: f64,
    pub points_max: u32,
    pub created_at: String,
}

impl Exam {
    pub fn new(name: impl Into<String>, questions: Vec<String>, summary: ExamSummary) -> Self {
        Self {
            name: name.into(),
            questions,
            time_est: summary.time_est,
            difficulty_avg: summary.difficulty_avg,
            points_max: summary.points_max,
            created_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    pub fn summary(&self) -> ExamSummary {
        ExamSummary {
            time_est: self.time_est,
            difficulty_avg: self.difficulty_avg,
            points_max: self.points_max,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// 整数也带一位小数（2.0 而不是 2）
fn format_difficulty(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
