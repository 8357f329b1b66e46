//! 随机变量来源 - 基础设施层
//!
//! 计算题的每个变量对应一组数值，由外部准备好后按题目名称读取。

use crate::error::ProviderError;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

/// 变量名 -> 取值数组
pub type VariableSet = HashMap<String, Vec<f64>>;

/// 随机变量来源
pub trait RandomVariableProvider {
    /// 读取某道题目的全部随机变量
    fn variables_for(&self, question: &str) -> Result<VariableSet, ProviderError>;
}

/// 从目录读取 `rv_<题目名称>.json`
///
/// 文件内容是一个 JSON 对象：变量名 -> 数值数组。
#[derive(Debug, Clone)]
pub struct JsonVariableProvider {
    dir: PathBuf,
}

impl JsonVariableProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file_path(&self, question: &str) -> PathBuf {
        self.dir.join(format!("rv_{}.json", question))
    }
}

impl RandomVariableProvider for JsonVariableProvider {
    fn variables_for(&self, question: &str) -> Result<VariableSet, ProviderError> {
        let path = self.file_path(question);
        let content = std::fs::read_to_string(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => ProviderError::NotFound {
                question: question.to_string(),
            },
            _ => ProviderError::ReadFailed {
                path: path.display().to_string(),
                source,
            },
        })?;

        serde_json::from_str(&content).map_err(|source| ProviderError::ParseFailed {
            path: path.display().to_string(),
            source,
        })
    }
}

/// 内存来源（题目名称 -> 变量）
impl RandomVariableProvider for HashMap<String, VariableSet> {
    fn variables_for(&self, question: &str) -> Result<VariableSet, ProviderError> {
        self.get(question)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound {
                question: question.to_string(),
            })
    }
}
