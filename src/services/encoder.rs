//! 题目编码 - 业务能力层
//!
//! 只负责"一道题 -> 一个 `<question>` 元素"，不关心考试和批量流程。
//!
//! 每个元素由两部分组成：
//! 1. 公共部分：名称、题干、通用反馈、分值、罚分、可见性、外部编号
//! 2. 题型部分：按固定顺序追加在公共部分之后

use crate::config::EncoderOptions;
use crate::error::EncodeError;
use crate::infrastructure::asset_store::AssetStore;
use crate::infrastructure::random_vars::RandomVariableProvider;
use crate::models::question::{
    Calculated, Ddimageortext, Essay, Gapselect, Matching, Multichoice, Numerical, Question,
    QuestionKind, Shortanswer,
};
use crate::services::dataset::dataset_definitions;
use crate::services::placeholder::{insert_gap_indices, PlaceholderResolver};
use crate::xml::Element;

pub const PENALTY: &str = "0.3333333";
pub const UNIT_PENALTY: &str = "0.1000000";
pub const CORRECT_FEEDBACK: &str = "Die Antwort ist richtig.";
pub const PARTIALLY_CORRECT_FEEDBACK: &str = "Die Antwort ist teilweise richtig.";
pub const INCORRECT_FEEDBACK: &str = "Die Antwort ist falsch.";

/// 题目编码器
pub struct QuestionEncoder<'a> {
    resolver: PlaceholderResolver<'a>,
    random_vars: &'a dyn RandomVariableProvider,
    options: EncoderOptions,
}

impl<'a> QuestionEncoder<'a> {
    pub fn new(
        assets: &'a dyn AssetStore,
        random_vars: &'a dyn RandomVariableProvider,
        options: EncoderOptions,
    ) -> Self {
        Self {
            resolver: PlaceholderResolver::new(assets),
            random_vars,
            options,
        }
    }

    /// 编码一道题目
    ///
    /// 题型字段缺失、占位符无法解析、素材读取失败等都返回 [`EncodeError`]，
    /// 由调用方决定跳过该题。
    pub fn encode(&self, question: &Question) -> Result<Element, EncodeError> {
        let kind = QuestionKind::from_question(question)?;

        let mut text = self.resolver.resolve(&question.question, question)?;
        if let QuestionKind::Gapselect(gapselect) = &kind {
            text = insert_gap_indices(&text, &gapselect.correct_answers)?;
        }

        let mut element = base_element(question, kind.moodle_type(), text);
        let tail = match &kind {
            QuestionKind::Multichoice(fields) => self.multichoice(question, fields)?,
            QuestionKind::Numerical(fields) => numerical(fields),
            QuestionKind::Shortanswer(fields) => shortanswer(fields),
            QuestionKind::Essay(fields) => essay(fields),
            QuestionKind::Matching(fields) => self.matching(question, fields)?,
            QuestionKind::Gapselect(fields) => self.gapselect(question, fields)?,
            QuestionKind::Ddimageortext(fields) => self.ddimageortext(question, fields)?,
            QuestionKind::Calculated(fields) => self.calculated(question, fields)?,
        };
        element.extend(tail);

        Ok(element)
    }

    fn shuffle(&self) -> Element {
        Element::with_text("shuffleanswers", bool_text(self.options.shuffle_answers))
    }

    fn multichoice(&self, question: &Question, fields: &Multichoice) -> Result<Vec<Element>, EncodeError> {
        let correct_count = fields.correct_answers.len();
        if correct_count == 0 {
            return Err(EncodeError::invalid_value("correct_answers", "至少需要一个正确答案"));
        }

        let single = fields.single.unwrap_or(correct_count == 1);
        let weight = 100.0 / correct_count as f64;
        let correct_fraction = format!("{:.6}", weight);
        let false_fraction = if single {
            "0".to_string()
        } else {
            format!("-{:.6}", weight)
        };

        let mut elements = vec![
            Element::with_text("single", bool_text(single)),
            self.shuffle(),
            Element::with_text("answernumbering", "abc"),
            Element::with_text("showstandardinstruction", "1"),
        ];
        elements.extend(feedback_block());
        elements.push(Element::new("shownumcorrect"));

        for answer in &fields.correct_answers {
            let text = self.resolver.resolve_images(answer, question)?;
            elements.push(html_answer(&correct_fraction, text));
        }
        for answer in &fields.false_answers {
            let text = self.resolver.resolve_images(answer, question)?;
            elements.push(html_answer(&false_fraction, text));
        }

        Ok(elements)
    }

    fn matching(&self, question: &Question, fields: &Matching) -> Result<Vec<Element>, EncodeError> {
        let mut elements = vec![self.shuffle()];
        elements.extend(feedback_block());

        for (prompt, answer) in &fields.correct_answers {
            let prompt = self.resolver.resolve_images(prompt, question)?;
            let answer = self.resolver.resolve_images(answer, question)?;
            elements.push(
                Element::new("subquestion")
                    .attr("format", "html")
                    .child(Element::with_cdata("text", prompt))
                    .child(Element::new("answer").child(Element::with_cdata("text", answer))),
            );
        }

        // 干扰项：空题面，只有答案
        for answer in &fields.false_answers {
            let answer = self.resolver.resolve_images(answer, question)?;
            elements.push(
                Element::new("subquestion")
                    .attr("format", "html")
                    .child(Element::with_text("text", ""))
                    .child(Element::new("answer").child(Element::with_cdata("text", answer))),
            );
        }

        Ok(elements)
    }

    fn gapselect(&self, question: &Question, fields: &Gapselect) -> Result<Vec<Element>, EncodeError> {
        let mut elements = vec![self.shuffle()];
        elements.extend(feedback_block());
        elements.push(Element::new("shownumcorrect"));

        for (index, values) in &fields.correct_answers {
            let literal = values.first().ok_or_else(|| {
                EncodeError::invalid_value("correct_answers", format!("空位 {} 没有正确选项", index))
            })?;
            elements.push(self.select_option(question, literal, index)?);
        }
        for (group, values) in &fields.false_answers {
            for literal in values {
                elements.push(self.select_option(question, literal, group)?);
            }
        }

        Ok(elements)
    }

    fn select_option(&self, question: &Question, literal: &str, group: &str) -> Result<Element, EncodeError> {
        let text = self.resolver.resolve_images(literal, question)?;
        Ok(Element::new("selectoption")
            .child(Element::with_cdata("text", text))
            .child(Element::with_text("group", group)))
    }

    fn ddimageortext(&self, question: &Question, fields: &Ddimageortext) -> Result<Vec<Element>, EncodeError> {
        let mut elements = vec![self.shuffle()];
        elements.extend(feedback_block());
        elements.push(Element::new("shownumcorrect"));

        // 背景图片直接放原始 base64，不是 data URI
        let (file_name, encoded) = self.resolver.background_image(question)?;
        elements.push(
            Element::with_text("file", encoded)
                .attr("name", file_name)
                .attr("encoding", "base64"),
        );

        for (i, label) in fields.correct_answers.iter().enumerate() {
            let text = self.resolver.resolve_images(label, question)?;
            elements.push(
                Element::new("drag")
                    .child(Element::with_text("no", (i + 1).to_string()))
                    .child(Element::with_cdata("text", text))
                    .child(Element::with_text("draggroup", "1")),
            );
        }

        for (no, (x, y)) in &fields.drops {
            elements.push(
                Element::new("drop")
                    .child(Element::with_text("text", ""))
                    .child(Element::with_text("no", no.as_str()))
                    .child(Element::with_text("choice", no.as_str()))
                    .child(Element::with_text("xleft", x.to_string()))
                    .child(Element::with_text("ytop", y.to_string())),
            );
        }

        Ok(elements)
    }

    fn calculated(&self, question: &Question, fields: &Calculated) -> Result<Vec<Element>, EncodeError> {
        let formula = fields
            .correct_answers
            .first()
            .ok_or_else(|| EncodeError::invalid_value("correct_answers", "缺少公式"))?;
        let (tolerance, kind, length) = &fields.tolerance;

        let mut elements = vec![
            Element::with_text("synchronize", "0"),
            Element::with_text("single", "0"),
            self.shuffle(),
            Element::with_text("answernumbering", "abc"),
        ];
        elements.extend(feedback_block());

        elements.push(
            Element::new("answer")
                .attr("fraction", "100")
                .child(Element::with_text("text", formula.as_str()))
                .child(Element::with_text("tolerance", tolerance.to_string()))
                .child(Element::with_text("tolerancetype", kind.code().to_string()))
                .child(Element::with_text("correctanswerformat", "1"))
                .child(Element::with_text("correctanswerlength", length.to_string()))
                .child(empty_feedback()),
        );
        elements.extend(unit_settings());
        elements.push(dataset_definitions(&question.name, &fields.vars, self.random_vars)?);

        Ok(elements)
    }
}

fn numerical(fields: &Numerical) -> Vec<Element> {
    let tolerance = fields
        .tolerance
        .as_ref()
        .map(|t| t.to_string())
        .unwrap_or_else(|| "0".to_string());

    let mut elements: Vec<Element> = fields
        .correct_answers
        .iter()
        .map(|answer| plain_answer(answer).child(Element::with_text("tolerance", tolerance.as_str())))
        .collect();
    elements.extend(unit_settings());
    elements
}

fn shortanswer(fields: &Shortanswer) -> Vec<Element> {
    let usecase = if fields.usecase { "1" } else { "0" };
    let mut elements = vec![Element::with_text("usecase", usecase)];
    elements.extend(fields.correct_answers.iter().map(|answer| plain_answer(answer)));
    elements
}

fn essay(fields: &Essay) -> Vec<Element> {
    let (attachments, required) = fields.answer_files;
    vec![
        Element::with_text("responseformat", "noinline"),
        Element::with_text("responserequired", "0"),
        Element::with_text("responsefieldlines", "15"),
        Element::with_text("attachments", attachments.to_string()),
        Element::with_text("attachmentsrequired", required.to_string()),
        Element::with_text("filetypeslist", ""),
        Element::text_block("graderinfo", "").attr("format", "html"),
        Element::text_block("responsetemplate", "").attr("format", "html"),
    ]
}

/// 公共部分
fn base_element(question: &Question, moodle_type: &str, text: String) -> Element {
    Element::new("question")
        .attr("type", moodle_type)
        .child(Element::text_block("name", question.name.as_str()))
        .child(
            Element::new("questiontext")
                .attr("format", "html")
                .child(Element::with_cdata("text", text)),
        )
        .child(Element::text_block("generalfeedback", "").attr("format", "html"))
        .child(Element::with_text("defaultgrade", question.points.to_string()))
        .child(Element::with_text("penalty", PENALTY))
        .child(Element::with_text("hidden", "0"))
        .child(Element::with_text("idnumber", ""))
}

/// 完全正确 / 部分正确 / 错误 三段反馈
pub fn feedback_block() -> [Element; 3] {
    [
        Element::text_block("correctfeedback", CORRECT_FEEDBACK).attr("format", "html"),
        Element::text_block("partiallycorrectfeedback", PARTIALLY_CORRECT_FEEDBACK)
            .attr("format", "html"),
        Element::text_block("incorrectfeedback", INCORRECT_FEEDBACK).attr("format", "html"),
    ]
}

fn unit_settings() -> [Element; 4] {
    [
        Element::with_text("unitgradingtype", "0"),
        Element::with_text("unitpenalty", UNIT_PENALTY),
        Element::with_text("showunits", "3"),
        Element::with_text("unitsleft", "0"),
    ]
}

fn html_answer(fraction: &str, text: String) -> Element {
    Element::new("answer")
        .attr("fraction", fraction)
        .attr("format", "html")
        .child(Element::with_cdata("text", text))
        .child(empty_feedback())
}

fn plain_answer(text: &str) -> Element {
    Element::new("answer")
        .attr("fraction", "100")
        .attr("format", "moodle_auto_format")
        .child(Element::with_text("text", text))
        .child(empty_feedback())
}

fn empty_feedback() -> Element {
    Element::text_block("feedback", "").attr("format", "html")
}

fn bool_text(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
