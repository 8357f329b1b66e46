use crate::error::EncodeError;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// 题库中的一条题目记录
///
/// 公共字段是强类型的；题型专属字段保留为 JSON 对象（`fields`），
/// 编码时再解析为 [`QuestionKind`]。这样题型字段有问题的题目仍然可以被读取，
/// 只在编码阶段单独失败。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// 唯一名称（分类前缀 + 编号）
    pub name: String,
    /// 题干（可包含占位符）
    pub question: String,
    pub moodle_type: String,
    pub points: u32,
    pub difficulty: i32,
    /// 预计用时（分钟）
    pub time_est: u32,
    /// 考试名称 -> 得分（尚未评估时为空）
    #[serde(default)]
    pub in_exams: IndexMap<String, Option<f64>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub img_files: Vec<String>,
    /// 表格 ID -> 二维表格（第一行是表头）
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub tables: IndexMap<String, Vec<Vec<Value>>>,
    /// 题型专属字段
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// 八种题型
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionKind {
    Multichoice(Multichoice),
    Numerical(Numerical),
    Shortanswer(Shortanswer),
    Essay(Essay),
    Matching(Matching),
    Gapselect(Gapselect),
    Ddimageortext(Ddimageortext),
    Calculated(Calculated),
}

impl QuestionKind {
    /// 根据 `moodle_type` 解析题型专属字段
    pub fn from_question(question: &Question) -> Result<Self, EncodeError> {
        match question.moodle_type.as_str() {
            "multichoice" => parse_fields(question).map(Self::Multichoice),
            "numerical" => parse_fields(question).map(Self::Numerical),
            "shortanswer" => parse_fields(question).map(Self::Shortanswer),
            "essay" => parse_fields(question).map(Self::Essay),
            "matching" => parse_fields(question).map(Self::Matching),
            "gapselect" => parse_fields(question).map(Self::Gapselect),
            "ddimageortext" => parse_fields(question).map(Self::Ddimageortext),
            "calculated" => parse_fields(question).map(Self::Calculated),
            other => Err(EncodeError::UnsupportedType {
                moodle_type: other.to_string(),
            }),
        }
    }

    /// XML 中 `type` 属性的值
    pub fn moodle_type(&self) -> &'static str {
        match self {
            QuestionKind::Multichoice(_) => "multichoice",
            QuestionKind::Numerical(_) => "numerical",
            QuestionKind::Shortanswer(_) => "shortanswer",
            QuestionKind::Essay(_) => "essay",
            QuestionKind::Matching(_) => "matching",
            QuestionKind::Gapselect(_) => "gapselect",
            QuestionKind::Ddimageortext(_) => "ddimageortext",
            QuestionKind::Calculated(_) => "calculated",
        }
    }
}

fn parse_fields<T: DeserializeOwned>(question: &Question) -> Result<T, EncodeError> {
    serde_json::from_value(Value::Object(question.fields.clone())).map_err(|source| {
        EncodeError::InvalidFields {
            moodle_type: question.moodle_type.clone(),
            source,
        }
    })
}

/// 单选 / 多选题
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Multichoice {
    #[serde(deserialize_with = "deserialize_texts")]
    pub correct_answers: Vec<String>,
    #[serde(deserialize_with = "deserialize_texts")]
    pub false_answers: Vec<String>,
    /// 显式指定单选模式；缺省时只有一个正确答案即为单选
    #[serde(default)]
    pub single: Option<bool>,
}

/// 数值题
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Numerical {
    #[serde(deserialize_with = "deserialize_texts")]
    pub correct_answers: Vec<String>,
    #[serde(default)]
    pub tolerance: Option<Number>,
}

/// 简答题
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Shortanswer {
    #[serde(deserialize_with = "deserialize_texts")]
    pub correct_answers: Vec<String>,
    /// 是否区分大小写
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub usecase: bool,
}

/// 作文题（只收附件）
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Essay {
    /// (最多附件数, 必须上传的附件数)
    pub answer_files: (i32, i32),
}

/// 配对题
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Matching {
    /// 题面 -> 答案
    #[serde(deserialize_with = "deserialize_text_map")]
    pub correct_answers: IndexMap<String, String>,
    /// 干扰项（只有答案，没有题面）
    #[serde(default, deserialize_with = "deserialize_texts")]
    pub false_answers: Vec<String>,
}

/// 下拉填空题
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Gapselect {
    /// 空位编号 -> [正确选项]
    #[serde(deserialize_with = "deserialize_text_groups")]
    pub correct_answers: IndexMap<String, Vec<String>>,
    /// 分组 -> 干扰选项
    #[serde(deserialize_with = "deserialize_text_groups")]
    pub false_answers: IndexMap<String, Vec<String>>,
}

/// 拖放到图片题
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Ddimageortext {
    /// 拖动标签（按顺序编号）
    #[serde(deserialize_with = "deserialize_texts")]
    pub correct_answers: Vec<String>,
    /// 放置区编号 -> [x, y]
    pub drops: IndexMap<String, (Number, Number)>,
}

/// 计算题
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Calculated {
    /// 第一个元素是公式模板
    #[serde(deserialize_with = "deserialize_texts")]
    pub correct_answers: Vec<String>,
    /// (容差, 容差类型, 有效位数)
    pub tolerance: (Number, ToleranceKind, u32),
    pub vars: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToleranceKind {
    Relative,
    Nominal,
    Geometric,
}

impl ToleranceKind {
    /// Moodle 的 tolerancetype 编码
    pub fn code(self) -> u8 {
        match self {
            ToleranceKind::Relative => 1,
            ToleranceKind::Nominal => 2,
            ToleranceKind::Geometric => 3,
        }
    }
}

/// 把任意 JSON 值转成文本（字符串原样返回）
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn deserialize_texts<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    Ok(values.iter().map(value_to_text).collect())
}

fn deserialize_text_map<'de, D>(deserializer: D) -> Result<IndexMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = IndexMap::<String, Value>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .map(|(k, v)| (k, value_to_text(&v)))
        .collect())
}

fn deserialize_text_groups<'de, D>(
    deserializer: D,
) -> Result<IndexMap<String, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = IndexMap::<String, Vec<Value>>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .map(|(k, v)| (k, v.iter().map(value_to_text).collect()))
        .collect())
}

// 布尔值或整数（0 / 1）
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct FlagVisitor;

    impl<'de> Visitor<'de> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a boolean or an integer flag")
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value != 0)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value != 0)
        }
    }

    deserializer.deserialize_any(FlagVisitor)
}
