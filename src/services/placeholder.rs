//! 占位符解析 - 业务能力层
//!
//! 题干和答案文本中的占位符：
//! - `[[tblN]]`  替换为 `tables` 中对应的表格
//! - `[[fileN]]` 替换为 `img_files` 第 N 个文件（从 1 开始）的 data URI 图片
//! - `[[字面值]]` 下拉填空题中替换为该字面值所在的空位编号

use crate::error::{EncodeError, XmlError};
use crate::infrastructure::asset_store::{media_subtype, AssetStore};
use crate::models::question::{value_to_text, Question};
use crate::xml::Element;
use base64::Engine as _;
use indexmap::IndexMap;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;

const TABLE_TOKEN: &str = r"\[\[(tbl\d+)\]\]";
const IMAGE_TOKEN: &str = r"\[\[file(\d+)\]\]";
const GAP_TOKEN: &str = r"\[\[(.+?)\]\]";
const CELL_STYLE: &str = "border-width: 1px; border-style: solid;";

/// 占位符解析器
///
/// 只依赖素材读取能力，不关心题型
pub struct PlaceholderResolver<'a> {
    assets: &'a dyn AssetStore,
}

impl<'a> PlaceholderResolver<'a> {
    pub fn new(assets: &'a dyn AssetStore) -> Self {
        Self { assets }
    }

    /// 依次替换表格和图片占位符
    pub fn resolve(&self, text: &str, question: &Question) -> Result<String, EncodeError> {
        let text = resolve_tables(text, question)?;
        self.resolve_images(&text, question)
    }

    /// 把 `[[fileN]]` 替换为内嵌 base64 图片
    pub fn resolve_images(&self, text: &str, question: &Question) -> Result<String, EncodeError> {
        let pattern = Regex::new(IMAGE_TOKEN)?;
        let mut cache: HashMap<usize, String> = HashMap::new();

        replace_tokens(text, &pattern, |caps| {
            let available = question.img_files.len();
            let index = caps[1]
                .parse::<usize>()
                .map_err(|_| EncodeError::UnresolvedImage {
                    index: 0,
                    available,
                })?;
            if let Some(tag) = cache.get(&index) {
                return Ok(tag.clone());
            }

            let path = index
                .checked_sub(1)
                .and_then(|i| question.img_files.get(i))
                .ok_or(EncodeError::UnresolvedImage { index, available })?;
            let tag = format!(r#"<img src="{}" alt="" />"#, self.data_uri(path)?);
            cache.insert(index, tag.clone());
            Ok(tag)
        })
    }

    /// 拖放题的背景图片：(文件名, 原始 base64 内容)
    pub fn background_image(&self, question: &Question) -> Result<(String, String), EncodeError> {
        let path = question
            .img_files
            .first()
            .ok_or_else(|| EncodeError::invalid_value("img_files", "缺少背景图片"))?;
        let bytes = self.assets.read(path)?;
        Ok((path.clone(), encode_base64(&bytes)))
    }

    fn data_uri(&self, path: &str) -> Result<String, EncodeError> {
        let subtype = media_subtype(path).ok_or_else(|| EncodeError::UnknownMediaType {
            path: path.to_string(),
        })?;
        let bytes = self.assets.read(path)?;
        Ok(format!("data:image/{};base64,{}", subtype, encode_base64(&bytes)))
    }
}

/// 把 `[[tblN]]` 替换为表格 HTML；表格不存在时报错
pub fn resolve_tables(text: &str, question: &Question) -> Result<String, EncodeError> {
    let pattern = Regex::new(TABLE_TOKEN)?;

    replace_tokens(text, &pattern, |caps| {
        let key = &caps[1];
        let rows = question
            .tables
            .get(key)
            .ok_or_else(|| EncodeError::UnresolvedTable {
                token: key.to_string(),
            })?;
        if rows.is_empty() {
            return Err(EncodeError::invalid_value("tables", format!("表格 {} 为空", key)));
        }
        Ok(render_table(rows)?)
    })
}

/// 渲染带边框的简单表格：第一行是表头，其余为表体
pub fn render_table(rows: &[Vec<Value>]) -> Result<String, XmlError> {
    let mut table = Element::new("table");

    if let Some((header, body)) = rows.split_first() {
        let mut head_row = Element::new("tr");
        head_row.extend(header.iter().map(|cell| {
            Element::with_text("th", value_to_text(cell))
                .attr("scope", "col")
                .attr("style", CELL_STYLE)
        }));
        table.push(Element::new("thead").child(head_row));

        let mut tbody = Element::new("tbody");
        for row in body {
            let mut tr = Element::new("tr");
            tr.extend(
                row.iter()
                    .map(|cell| Element::with_text("td", value_to_text(cell)).attr("style", CELL_STYLE)),
            );
            tbody.push(tr);
        }
        table.push(tbody);
    }

    table.to_xml_string()
}

/// 下拉填空题：把 `[[字面值]]` 替换为 `[[空位编号]]`
///
/// 只扫描一遍；字面值在多个空位中重复时取第一个。没有匹配的占位符保持原样。
pub fn insert_gap_indices(
    text: &str,
    correct_answers: &IndexMap<String, Vec<String>>,
) -> Result<String, EncodeError> {
    let pattern = Regex::new(GAP_TOKEN)?;

    replace_tokens(text, &pattern, |caps| {
        let literal = &caps[1];
        let key = correct_answers
            .iter()
            .find(|(_, values)| values.first().map(String::as_str) == Some(literal))
            .map(|(key, _)| key.as_str())
            .unwrap_or(literal);
        Ok(format!("[[{}]]", key))
    })
}

fn encode_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

fn replace_tokens<F>(text: &str, pattern: &Regex, mut replace: F) -> Result<String, EncodeError>
where
    F: FnMut(&Captures) -> Result<String, EncodeError>,
{
    let mut output = String::with_capacity(text.len());
    let mut last = 0;

    for caps in pattern.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        output.push_str(&text[last..whole.start()]);
        output.push_str(&replace(&caps)?);
        last = whole.end();
    }
    output.push_str(&text[last..]);

    Ok(output)
}
