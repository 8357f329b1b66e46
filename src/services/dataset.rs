//! 计算题数据集 - 业务能力层
//!
//! 每个公式变量对应一个私有数据集：取值范围、保留小数位数和全部取值。

use crate::error::EncodeError;
use crate::infrastructure::random_vars::RandomVariableProvider;
use crate::xml::Element;

/// 一组数值需要保留的小数位数
///
/// 单个数值的规则：
/// - 整数：0
/// - 规范字符串是指数形式（比定点形式更短时使用）：指数非负为 0，负指数为 `|指数| - 1`
/// - 否则：小数点后的字符数
///
/// 返回所有数值中的最大值；空数组为 0。
pub fn count_decimals(values: &[f64]) -> u32 {
    values.iter().copied().map(decimal_precision).max().unwrap_or(0)
}

fn decimal_precision(value: f64) -> u32 {
    if value == value.trunc() {
        return 0;
    }

    let positional = value.to_string();
    let scientific = format!("{:e}", value);

    if scientific.len() < positional.len() {
        let exponent = scientific
            .rsplit_once('e')
            .and_then(|(_, e)| e.parse::<i32>().ok())
            .unwrap_or(0);
        if exponent >= 0 {
            0
        } else {
            exponent.unsigned_abs() - 1
        }
    } else {
        positional
            .split_once('.')
            .map(|(_, fraction)| fraction.len() as u32)
            .unwrap_or(0)
    }
}

/// 为计算题的所有变量生成 `<dataset_definitions>`
pub fn dataset_definitions(
    question_name: &str,
    vars: &[String],
    provider: &dyn RandomVariableProvider,
) -> Result<Element, EncodeError> {
    let variables = provider.variables_for(question_name)?;
    let mut definitions = Element::new("dataset_definitions");

    for name in vars {
        let values = variables
            .get(name)
            .ok_or_else(|| EncodeError::MissingVariable { name: name.clone() })?;
        definitions.push(dataset_definition(name, values)?);
    }

    Ok(definitions)
}

/// 单个变量的 `<dataset_definition>`
pub fn dataset_definition(name: &str, values: &[f64]) -> Result<Element, EncodeError> {
    if values.is_empty() {
        return Err(EncodeError::EmptyDataset {
            name: name.to_string(),
        });
    }

    let minimum = values.iter().copied().fold(f64::INFINITY, f64::min).floor();
    let maximum = values.iter().copied().fold(f64::NEG_INFINITY, f64::max).ceil();
    let decimals = count_decimals(values);

    let mut items = Element::new("dataset_items");
    for (i, value) in values.iter().enumerate() {
        items.push(
            Element::new("dataset_item")
                .child(Element::with_text("number", (i + 1).to_string()))
                .child(Element::with_text("value", format_value(*value, decimals))),
        );
    }

    Ok(Element::new("dataset_definition")
        .child(Element::text_block("status", "private"))
        .child(Element::text_block("name", name))
        .child(Element::with_text("type", "calculated"))
        .child(Element::text_block("distribution", "uniform"))
        .child(Element::text_block("minimum", format_integral(minimum)))
        .child(Element::text_block("maximum", format_integral(maximum)))
        .child(Element::text_block("decimals", decimals.to_string()))
        .child(Element::with_text("itemcount", values.len().to_string()))
        .child(items)
        .child(Element::with_text("number_of_items", values.len().to_string())))
}

// 没有小数位时按整数截断输出
fn format_value(value: f64, decimals: u32) -> String {
    if decimals == 0 {
        format_integral(value.trunc())
    } else {
        value.to_string()
    }
}

fn format_integral(value: f64) -> String {
    (value as i64).to_string()
}
