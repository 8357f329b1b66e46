#![allow(dead_code)]

use exam_quiz_export::infrastructure::VariableSet;
use exam_quiz_export::Question;
use serde_json::{json, Value};
use std::collections::HashMap;

/// 构造题目：公共字段使用默认值，`extra` 覆盖或补充字段
pub fn question(name: &str, moodle_type: &str, extra: Value) -> Question {
    let mut record = json!({
        "name": name,
        "question": format!("Frage {}", name),
        "moodle_type": moodle_type,
        "points": 2,
        "difficulty": 2,
        "time_est": 5,
    });
    if let (Some(base), Value::Object(extra)) = (record.as_object_mut(), extra) {
        base.extend(extra);
    }
    serde_json::from_value(record).expect("题目记录无效")
}

pub fn multichoice(name: &str, correct: &[&str], wrong: &[&str]) -> Question {
    question(
        name,
        "multichoice",
        json!({ "correct_answers": correct, "false_answers": wrong }),
    )
}

pub fn assets(entries: &[(&str, &[u8])]) -> HashMap<String, Vec<u8>> {
    entries
        .iter()
        .map(|(path, bytes)| (path.to_string(), bytes.to_vec()))
        .collect()
}

pub fn no_assets() -> HashMap<String, Vec<u8>> {
    HashMap::new()
}

pub fn variables(question: &str, vars: &[(&str, &[f64])]) -> HashMap<String, VariableSet> {
    let set: VariableSet = vars
        .iter()
        .map(|(name, values)| (name.to_string(), values.to_vec()))
        .collect();
    HashMap::from([(question.to_string(), set)])
}

pub fn no_variables() -> HashMap<String, VariableSet> {
    HashMap::new()
}
