use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 可打乱选项的题型是否打乱选项
    pub shuffle_answers: bool,
    /// 题目文件（JSON / TOML）存放目录
    pub questions_folder: String,
    /// 图片素材目录
    pub assets_dir: String,
    /// 计算题随机变量目录
    pub random_vars_dir: String,
    /// 导出 XML 的根目录（每个考试一个子目录）
    pub exams_dir: String,
    /// 考试题目清单目录
    pub exam_lists_folder: String,
    /// 考试记录文件
    pub exam_store_file: String,
    /// 导出文件名
    pub output_filename: String,
    /// 问题题目报告文件
    pub report_file: String,
    /// 题目分类（为空时不检查命名）
    pub categories: Vec<String>,
    /// 是否写入考试记录（false 时只生成测试用 XML）
    pub persist_exams: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shuffle_answers: true,
            questions_folder: "questions".to_string(),
            assets_dir: "img".to_string(),
            random_vars_dir: "random_vars".to_string(),
            exams_dir: "exams".to_string(),
            exam_lists_folder: "exam_lists".to_string(),
            exam_store_file: "exams.json".to_string(),
            output_filename: "import.xml".to_string(),
            report_file: "warn.txt".to_string(),
            categories: Vec::new(),
            persist_exams: true,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            shuffle_answers: std::env::var("SHUFFLE_ANSWERS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.shuffle_answers),
            questions_folder: std::env::var("QUESTIONS_FOLDER").unwrap_or(default.questions_folder),
            assets_dir: std::env::var("ASSETS_DIR").unwrap_or(default.assets_dir),
            random_vars_dir: std::env::var("RANDOM_VARS_DIR").unwrap_or(default.random_vars_dir),
            exams_dir: std::env::var("EXAMS_DIR").unwrap_or(default.exams_dir),
            exam_lists_folder: std::env::var("EXAM_LISTS_FOLDER").unwrap_or(default.exam_lists_folder),
            exam_store_file: std::env::var("EXAM_STORE_FILE").unwrap_or(default.exam_store_file),
            output_filename: std::env::var("OUTPUT_FILENAME").unwrap_or(default.output_filename),
            report_file: std::env::var("REPORT_FILE").unwrap_or(default.report_file),
            categories: std::env::var("QUESTION_CATEGORIES").ok().map(|v| parse_categories(&v)).unwrap_or(default.categories),
            persist_exams: std::env::var("PERSIST_EXAMS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.persist_exams),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 从 TOML 文件加载配置，缺省字段使用默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    /// 传给编码器的选项
    pub fn encoder_options(&self) -> EncoderOptions {
        EncoderOptions {
            shuffle_answers: self.shuffle_answers,
        }
    }
}

/// 编码器选项，显式传入每次编码调用
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncoderOptions {
    pub shuffle_answers: bool,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            shuffle_answers: true,
        }
    }
}

fn parse_categories(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
