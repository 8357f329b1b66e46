//! 考试记录存储 - 基础设施层
//!
//! 考试记录在编译成功后写入一次，之后本系统不再修改。

use crate::error::ExamStoreError;
use crate::models::exam::Exam;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// 考试记录存储
pub trait ExamStore {
    /// 写入新考试；同名考试已存在时报错
    fn insert(&mut self, exam: Exam) -> Result<(), ExamStoreError>;

    fn find(&self, name: &str) -> Result<Option<Exam>, ExamStoreError>;

    fn list(&self) -> Result<Vec<Exam>, ExamStoreError>;
}

/// 所有考试记录保存在一个 JSON 文件中
#[derive(Debug, Clone)]
pub struct JsonExamStore {
    path: PathBuf,
}

impl JsonExamStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<Exam>, ExamStoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(self.io_error(source)),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|source| ExamStoreError::Json {
            path: self.path.display().to_string(),
            source,
        })
    }

    fn save(&self, exams: &[Exam]) -> Result<(), ExamStoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        let content =
            serde_json::to_string_pretty(exams).map_err(|source| ExamStoreError::Json {
                path: self.path.display().to_string(),
                source,
            })?;
        std::fs::write(&self.path, content).map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: std::io::Error) -> ExamStoreError {
        ExamStoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl ExamStore for JsonExamStore {
    fn insert(&mut self, exam: Exam) -> Result<(), ExamStoreError> {
        let mut exams = self.load()?;
        if exams.iter().any(|e| e.name == exam.name) {
            return Err(ExamStoreError::DuplicateExam { name: exam.name });
        }
        tracing::debug!("写入考试记录: {}", exam.name);
        exams.push(exam);
        self.save(&exams)
    }

    fn find(&self, name: &str) -> Result<Option<Exam>, ExamStoreError> {
        Ok(self.load()?.into_iter().find(|e| e.name == name))
    }

    fn list(&self) -> Result<Vec<Exam>, ExamStoreError> {
        self.load()
    }
}
