//! 素材读取 - 基础设施层
//!
//! 只负责"按引用读取字节"的能力

use crate::error::AssetError;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

/// 素材存储
pub trait AssetStore {
    /// 读取素材的原始字节
    fn read(&self, path: &str) -> Result<Vec<u8>, AssetError>;
}

/// 基于目录的素材存储，引用相对于 `root`
#[derive(Debug, Clone)]
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetStore for FsAssetStore {
    fn read(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        let full_path = self.root.join(path);
        std::fs::read(&full_path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => AssetError::NotFound {
                path: full_path.display().to_string(),
            },
            _ => AssetError::ReadFailed {
                path: full_path.display().to_string(),
                source,
            },
        })
    }
}

/// 内存素材（引用 -> 字节）
impl AssetStore for HashMap<String, Vec<u8>> {
    fn read(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        self.get(path).cloned().ok_or_else(|| AssetError::NotFound {
            path: path.to_string(),
        })
    }
}

/// 根据文件扩展名推断图片 MIME 子类型
///
/// 取最后一个 `.` 之后的部分并转小写；`jpg` 归一为 `jpeg`，`svg` 为 `svg+xml`。
pub fn media_subtype(path: &str) -> Option<String> {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let (_, extension) = file_name.rsplit_once('.')?;
    if extension.is_empty() {
        return None;
    }
    let subtype = match extension.to_lowercase().as_str() {
        "jpg" => "jpeg".to_string(),
        "svg" => "svg+xml".to_string(),
        "tif" => "tiff".to_string(),
        other => other.to_string(),
    };
    Some(subtype)
}
