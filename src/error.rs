use thiserror::Error;

/// 应用程序错误类型
///
/// 只有"整批失败"的错误才会走到这里；单道题目的问题由 [`EncodeError`] 表示，
/// 在编排层被捕获并写入报告。
#[derive(Debug, Error)]
pub enum AppError {
    /// 文件系统错误（创建目录、写文件失败）
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 题库访问错误
    #[error("题库错误: {0}")]
    Repository(#[from] RepositoryError),
    /// 考试记录存储错误
    #[error("考试记录错误: {0}")]
    ExamStore(#[from] ExamStoreError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// XML 序列化错误
    #[error("XML错误: {0}")]
    Xml(#[from] XmlError),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 创建目录失败
    #[error("无法创建目录 ({path}): {source}")]
    CreateDirFailed {
        path: String,
        source: std::io::Error,
    },
    /// 读取目录失败
    #[error("无法读取目录 ({path}): {source}")]
    ReadDirFailed {
        path: String,
        source: std::io::Error,
    },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        source: std::io::Error,
    },
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
    /// 考试名称不能作为单层目录名使用
    #[error("考试名称无效: {name:?}")]
    InvalidExamName { name: String },
}

/// 题库错误（对整次编译是致命的）
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// 底层存储不可用
    #[error("题库不可用: {source}")]
    Unavailable {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 考试记录存储错误
#[derive(Debug, Error)]
pub enum ExamStoreError {
    /// 考试名称已存在（考试记录只写一次）
    #[error("考试 {name} 已存在")]
    DuplicateExam { name: String },
    /// 读写存储文件失败
    #[error("考试记录文件读写失败 ({path}): {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    /// JSON 解析或序列化失败
    #[error("考试记录文件格式错误 ({path}): {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("无法读取配置文件 ({path}): {source}")]
    ReadFailed {
        path: String,
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        source: toml::de::Error,
    },
}

/// XML 序列化错误
#[derive(Debug, Error)]
#[error("XML 序列化失败: {message}")]
pub struct XmlError {
    pub message: String,
}

impl XmlError {
    pub fn from_display(err: impl std::fmt::Display) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// 素材读取错误
#[derive(Debug, Error)]
pub enum AssetError {
    /// 素材不存在
    #[error("素材不存在: {path}")]
    NotFound { path: String },
    /// 读取失败
    #[error("读取素材失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        source: std::io::Error,
    },
}

/// 随机变量来源错误
#[derive(Debug, Error)]
pub enum ProviderError {
    /// 没有为该题目准备随机变量
    #[error("题目 {question} 没有随机变量定义")]
    NotFound { question: String },
    /// 读取失败
    #[error("读取随机变量失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        source: std::io::Error,
    },
    /// 解析失败
    #[error("随机变量格式错误 ({path}): {source}")]
    ParseFailed {
        path: String,
        source: serde_json::Error,
    },
}

/// 单道题目的编码错误（MalformedQuestion）
///
/// 编排层捕获后跳过该题，继续处理剩余题目。
#[derive(Debug, Error)]
pub enum EncodeError {
    /// 不支持的题型
    #[error("不支持的题型: {moodle_type}")]
    UnsupportedType { moodle_type: String },
    /// 题型字段缺失或类型不对
    #[error("{moodle_type} 题型字段无效: {source}")]
    InvalidFields {
        moodle_type: String,
        source: serde_json::Error,
    },
    /// 字段值不合法
    #[error("字段 {field} 无效: {reason}")]
    InvalidValue { field: &'static str, reason: String },
    /// 表格占位符找不到对应表格
    #[error("未找到表格: {token}")]
    UnresolvedTable { token: String },
    /// 图片占位符超出 img_files 范围
    #[error("图片占位符 [[file{index}]] 超出范围 (共 {available} 个文件)")]
    UnresolvedImage { index: usize, available: usize },
    /// 素材文件没有扩展名，无法推断图片类型
    #[error("无法从文件名推断图片类型: {path}")]
    UnknownMediaType { path: String },
    /// 素材读取失败
    #[error(transparent)]
    Asset(#[from] AssetError),
    /// 随机变量读取失败
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// 随机变量缺失
    #[error("缺少随机变量: {name}")]
    MissingVariable { name: String },
    /// 随机变量数组为空
    #[error("随机变量 {name} 没有取值")]
    EmptyDataset { name: String },
    /// 内嵌表格渲染失败
    #[error(transparent)]
    Xml(#[from] XmlError),
    /// 占位符正则编译失败
    #[error("占位符正则错误: {0}")]
    Pattern(#[from] regex::Error),
}

// ========== 便捷构造函数 ==========

impl EncodeError {
    /// 创建字段值不合法错误
    pub fn invalid_value(field: &'static str, reason: impl Into<String>) -> Self {
        EncodeError::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

impl AppError {
    /// 创建目录创建失败错误
    pub fn create_dir_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::CreateDirFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入失败错误
    pub fn write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件读取失败错误
    pub fn read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
