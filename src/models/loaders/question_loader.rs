use crate::models::question::Question;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// TOML 题目文件的结构：`[[questions]]` 数组
///
/// 记录先保持为原始值，逐条转换，单条记录出错不影响同一文件中的其他题目。
#[derive(Debug, Deserialize)]
struct QuestionFile {
    #[serde(default)]
    questions: Vec<toml::Value>,
}

/// 从单个 JSON / TOML 文件加载题目
///
/// JSON 文件是题目记录数组；TOML 文件使用 `[[questions]]` 表数组。
/// 无法转换的记录记录警告后跳过，其余记录照常返回。
pub fn load_question_file(path: &Path) -> Result<Vec<Question>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("无法读取题目文件: {}", path.display()))?;

    let questions: Vec<Question> = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => {
            let records: Vec<serde_json::Value> = serde_json::from_str(&content)
                .with_context(|| format!("无法解析JSON文件: {}", path.display()))?;
            records
                .into_iter()
                .enumerate()
                .filter_map(|(index, record)| {
                    let name = record.get("name").and_then(|v| v.as_str()).map(str::to_string);
                    keep_record(path, index, name, serde_json::from_value(record))
                })
                .collect()
        }
        Some("toml") => {
            let file: QuestionFile = toml::from_str(&content)
                .with_context(|| format!("无法解析TOML文件: {}", path.display()))?;
            file.questions
                .into_iter()
                .enumerate()
                .filter_map(|(index, record)| {
                    let name = record.get("name").and_then(|v| v.as_str()).map(str::to_string);
                    keep_record(path, index, name, record.try_into::<Question>())
                })
                .collect()
        }
        _ => anyhow::bail!("不支持的题目文件类型: {}", path.display()),
    };

    Ok(questions)
}

fn keep_record<E: std::fmt::Display>(
    path: &Path,
    index: usize,
    name: Option<String>,
    parsed: std::result::Result<Question, E>,
) -> Option<Question> {
    match parsed {
        Ok(question) => Some(question),
        Err(e) => {
            tracing::warn!(
                "{} 第 {} 条记录 ({}) 无效，已忽略: {}",
                path.display(),
                index + 1,
                name.as_deref().unwrap_or("未命名"),
                e
            );
            None
        }
    }
}

/// 从文件夹中加载所有题目文件
///
/// # 参数
/// - `folder_path`: 题目文件夹
/// - `categories`: 允许的分类；为空时不检查命名
///
/// # 返回
/// 返回去重后的题目列表。重名题目只保留第一条，命名不符合分类的题目被丢弃，
/// 无法解析的文件记录警告后跳过。
pub fn load_all_question_files(folder_path: &str, categories: &[String]) -> Result<Vec<Question>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(&folder).with_context(|| format!("无法读取文件夹: {}", folder_path))? {
        let path = entry?.path();
        if matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("json") | Some("toml")
        ) {
            files.push(path);
        }
    }
    files.sort();

    let mut seen = HashSet::new();
    let mut questions = Vec::new();

    for path in files {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        let loaded = match load_question_file(&path) {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {:#}", path.display(), e);
                continue;
            }
        };

        let mut accepted = 0;
        for question in loaded {
            if !matches_category(&question.name, categories) {
                tracing::warn!("题目 {} 命名不符合分类规则，已忽略", question.name);
                continue;
            }
            if !seen.insert(question.name.clone()) {
                tracing::warn!("题目 {} 重复，已忽略", question.name);
                continue;
            }
            questions.push(question);
            accepted += 1;
        }
        tracing::info!("成功加载 {} 个题目", accepted);
    }

    Ok(questions)
}

/// 题目名称去掉最后四位编号后必须是已知分类
fn matches_category(name: &str, categories: &[String]) -> bool {
    if categories.is_empty() {
        return true;
    }
    let char_count = name.chars().count();
    if char_count < 4 {
        return false;
    }
    let prefix: String = name.chars().take(char_count - 4).collect();
    categories.iter().any(|c| *c == prefix)
}
