//! 单个考试编译器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责把一个考试的题目清单编译成一个导出文件，是考试级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **文档外壳**：`<quiz>` 根元素 + 分类标记（`$course$/top/<考试>`）
//! 2. **遍历题目**：按清单顺序委托 `QuestionFlow`，缺失和无法编码的题目记入报告后跳过
//! 3. **汇总指标**：只统计实际写入文档的题目
//! 4. **写入文件**：`<exams_dir>/<考试>/<文件名>`，重名时追加版本号，从不覆盖

use crate::config::Config;
use crate::error::{AppError, AppResult, FileError};
use crate::infrastructure::{AssetStore, QuestionRepository, RandomVariableProvider};
use crate::models::exam::{Exam, ExamSummary};
use crate::models::report::CompileReport;
use crate::workflow::{ProcessResult, QuestionCtx, QuestionFlow};
use crate::xml::{render_document, Element, XmlNode};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// 一次编译的结果
#[derive(Debug)]
pub struct Compilation {
    /// 考试记录（题目列表只包含写入文档的题目）
    pub exam: Exam,
    /// 实际写入的文件
    pub output_path: PathBuf,
    /// 缺失和无法编码的题目
    pub report: CompileReport,
}

/// 题目处理统计
#[derive(Debug, Default)]
pub struct QuestionStats {
    pub encoded: usize,
    pub missing: usize,
    pub malformed: usize,
}

/// 考试编译器
///
/// 只持有借用的资源，可以连续编译多个考试
pub struct ExamAssembler<'a> {
    exams_dir: PathBuf,
    output_filename: String,
    flow: QuestionFlow<'a>,
}

impl<'a> ExamAssembler<'a> {
    pub fn new(
        config: &Config,
        repository: &'a dyn QuestionRepository,
        assets: &'a dyn AssetStore,
        random_vars: &'a dyn RandomVariableProvider,
    ) -> Self {
        Self {
            exams_dir: PathBuf::from(&config.exams_dir),
            output_filename: config.output_filename.clone(),
            flow: QuestionFlow::new(config, repository, assets, random_vars),
        }
    }

    /// 编译一个考试
    ///
    /// 单道题目的问题不会中断编译；题库不可用、目录创建失败、文件写入失败才返回错误。
    pub fn compile(&self, exam_name: &str, question_names: &[String]) -> AppResult<Compilation> {
        validate_exam_name(exam_name)?;
        log_exam_start(exam_name, question_names.len());

        let mut quiz = Element::new("quiz");
        quiz.push_node(XmlNode::Comment("question: 0".to_string()));
        quiz.push(category_marker(exam_name));

        let mut stats = QuestionStats::default();
        let mut report = CompileReport::default();
        let mut used = Vec::new();

        for (index, name) in question_names.iter().enumerate() {
            let ctx = QuestionCtx::new(
                exam_name.to_string(),
                index + 1,
                question_names.len(),
                name.clone(),
            );

            match self.flow.run(&ctx)? {
                ProcessResult::Encoded { question, element } => {
                    quiz.push(element);
                    used.push(question);
                    stats.encoded += 1;
                }
                ProcessResult::Missing => {
                    report.missing(name.as_str());
                    stats.missing += 1;
                }
                ProcessResult::Malformed(e) => {
                    report.malformed(name.as_str(), e);
                    stats.malformed += 1;
                }
            }
        }

        let summary = ExamSummary::from_questions(&used);

        let exam_dir = self.exams_dir.join(exam_name);
        fs::create_dir_all(&exam_dir)
            .map_err(|e| AppError::create_dir_failed(exam_dir.display().to_string(), e))?;

        let output_path = versioned_path(&exam_dir, &self.output_filename);
        let content = render_document(&summary.header_comment(), &quiz)?;
        fs::write(&output_path, content)
            .map_err(|e| AppError::write_failed(output_path.display().to_string(), e))?;

        let exam = Exam::new(
            exam_name,
            used.into_iter().map(|q| q.name).collect(),
            summary,
        );
        log_exam_complete(exam_name, &stats, &summary, &output_path);

        Ok(Compilation {
            exam,
            output_path,
            report,
        })
    }
}

/// 考试名称直接用作 `exams_dir` 下的目录名，只允许单个普通路径段
fn validate_exam_name(exam_name: &str) -> AppResult<()> {
    let invalid = exam_name.is_empty()
        || exam_name == "."
        || exam_name.contains("..")
        || exam_name.contains(['/', '\\']);
    if invalid {
        return Err(FileError::InvalidExamName {
            name: exam_name.to_string(),
        }
        .into());
    }
    Ok(())
}

/// 把后续所有题目归到 `$course$/top/<考试>` 分类下
fn category_marker(exam_name: &str) -> Element {
    Element::new("question")
        .attr("type", "category")
        .child(Element::text_block(
            "category",
            format!("$course$/top/{}", exam_name),
        ))
        .child(Element::text_block("info", "").attr("format", "moodle_auto_format"))
        .child(Element::with_text("idnumber", ""))
}

/// 选择不与已有文件冲突的输出路径
///
/// `import.xml` 已存在时依次尝试 `import-1.xml`、`import-2.xml`……
/// 文件名本身带有 `-数字` 后缀时先去掉再编号。
pub fn versioned_path(dir: &Path, filename: &str) -> PathBuf {
    let stem = filename.strip_suffix(".xml").unwrap_or(filename);

    let candidate = dir.join(format!("{}.xml", stem));
    if !candidate.exists() {
        return candidate;
    }

    let base = strip_version(stem);
    let mut version = 1;
    loop {
        let candidate = dir.join(format!("{}-{}.xml", base, version));
        if !candidate.exists() {
            return candidate;
        }
        version += 1;
    }
}

fn strip_version(stem: &str) -> &str {
    match stem.rsplit_once('-') {
        Some((base, suffix)) if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) => {
            base
        }
        _ => stem,
    }
}

// ========== 日志辅助函数 ==========

fn log_exam_start(exam_name: &str, question_count: usize) {
    info!("[考试 {}] 开始编译", exam_name);
    info!("[考试 {}] 题目总数: {}", exam_name, question_count);
}

fn log_exam_complete(exam_name: &str, stats: &QuestionStats, summary: &ExamSummary, path: &Path) {
    info!(
        "[考试 {}] 题目统计: 成功 {}, 缺失 {}, 无法编码 {}",
        exam_name, stats.encoded, stats.missing, stats.malformed
    );
    info!("[考试 {}] {}", exam_name, summary);
    info!("[考试 {}] ✅ 已写入: {}", exam_name, path.display());
}
