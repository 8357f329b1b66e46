//! 题目处理流程 - 流程层
//!
//! 核心职责：定义"一道题"的完整处理流程
//!
//! 流程顺序：
//! 1. 从题库查找 → 不存在则记为缺失
//! 2. 解析题型并编码 → 失败则记为无法编码
//! 3. 成功时交回题目记录和 `<question>` 元素

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{EncodeError, RepositoryError};
use crate::infrastructure::{AssetStore, QuestionRepository, RandomVariableProvider};
use crate::models::question::Question;
use crate::services::QuestionEncoder;
use crate::utils::logging::truncate_text;
use crate::workflow::question_ctx::QuestionCtx;
use crate::xml::Element;

/// 题目处理结果
#[derive(Debug)]
pub enum ProcessResult {
    /// 编码成功
    Encoded { question: Question, element: Element },
    /// 题库中不存在
    Missing,
    /// 题目存在但无法编码
    Malformed(EncodeError),
}

/// 题目处理流程
///
/// - 决定何时查找、何时编码、何时记为问题题目
/// - 单题失败不向上传播；只有题库整体不可用才返回错误
pub struct QuestionFlow<'a> {
    repository: &'a dyn QuestionRepository,
    encoder: QuestionEncoder<'a>,
    verbose_logging: bool,
}

impl<'a> QuestionFlow<'a> {
    pub fn new(
        config: &Config,
        repository: &'a dyn QuestionRepository,
        assets: &'a dyn AssetStore,
        random_vars: &'a dyn RandomVariableProvider,
    ) -> Self {
        Self {
            repository,
            encoder: QuestionEncoder::new(assets, random_vars, config.encoder_options()),
            verbose_logging: config.verbose_logging,
        }
    }

    pub fn run(&self, ctx: &QuestionCtx) -> Result<ProcessResult, RepositoryError> {
        let Some(question) = self.repository.find(&ctx.name)? else {
            warn!("{} ⚠️ 题库中不存在，跳过", ctx);
            return Ok(ProcessResult::Missing);
        };

        if self.verbose_logging {
            debug!(
                "{} 题型: {} | 题干: {}",
                ctx,
                question.moodle_type,
                truncate_text(&question.question, 80)
            );
        }

        match self.encoder.encode(&question) {
            Ok(element) => {
                info!("{} ✓ 编码完成 ({})", ctx, question.moodle_type);
                Ok(ProcessResult::Encoded { question, element })
            }
            Err(e) => {
                warn!("{} ⚠️ 无法编码，跳过: {}", ctx, e);
                Ok(ProcessResult::Malformed(e))
            }
        }
    }
}
