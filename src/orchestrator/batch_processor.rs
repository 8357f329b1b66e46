//! 批量考试处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量考试的编译和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：加载题库，准备素材目录、随机变量目录和考试记录存储
//! 2. **批量加载**：扫描考试清单目录中的所有 `*.txt` 文件
//! 3. **顺序编译**：逐个委托 `ExamAssembler` 编译考试
//! 4. **考试记录**：正式模式下写入考试记录，测试模式只生成 XML
//! 5. **全局统计**：汇总所有考试的编译结果

use crate::config::Config;
use crate::error::{AppError, AppResult, FileError};
use crate::infrastructure::{
    ExamStore, FsAssetStore, JsonExamStore, JsonVariableProvider, MemoryRepository,
};
use crate::models::load_all_question_files;
use crate::orchestrator::exam_assembler::ExamAssembler;
use crate::services::ReportWriter;
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// 一份考试清单：考试名称 + 题目名称
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamList {
    pub name: String,
    pub questions: Vec<String>,
}

/// 应用主结构
pub struct App {
    config: Config,
    repository: MemoryRepository,
    assets: FsAssetStore,
    random_vars: JsonVariableProvider,
    exam_store: JsonExamStore,
    report_writer: ReportWriter,
}

impl App {
    /// 初始化应用：加载题库
    pub fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        info!("\n📁 正在加载题库: {}", config.questions_folder);
        let questions = load_all_question_files(&config.questions_folder, &config.categories)?;
        let repository = MemoryRepository::from_questions(questions);
        info!("✓ 题库中共有 {} 道题目", repository.len());

        Ok(Self {
            assets: FsAssetStore::new(&config.assets_dir),
            random_vars: JsonVariableProvider::new(&config.random_vars_dir),
            exam_store: JsonExamStore::new(&config.exam_store_file),
            report_writer: ReportWriter::with_path(&config.report_file),
            repository,
            config,
        })
    }

    /// 运行应用主逻辑
    pub fn run(&mut self) -> Result<()> {
        let exam_lists = load_exam_lists(&self.config.exam_lists_folder)?;

        if exam_lists.is_empty() {
            warn!("⚠️ 没有找到考试清单文件，程序结束");
            return Ok(());
        }

        info!("✓ 找到 {} 个考试清单", exam_lists.len());

        let stats = self.compile_all(&exam_lists)?;
        print_final_stats(&stats, &self.config);

        Ok(())
    }

    /// 顺序编译所有考试
    fn compile_all(&mut self, exam_lists: &[ExamList]) -> AppResult<ProcessingStats> {
        let mut stats = ProcessingStats {
            total: exam_lists.len(),
            ..Default::default()
        };

        for (index, list) in exam_lists.iter().enumerate() {
            info!("\n{}", "=".repeat(60));
            info!("📦 考试 {}/{}: {}", index + 1, exam_lists.len(), list.name);
            info!("{}", "=".repeat(60));

            if self.config.persist_exams && self.exam_store.find(&list.name)?.is_some() {
                warn!("[考试 {}] ⚠️ 考试记录已存在，跳过", list.name);
                stats.skipped += 1;
                continue;
            }

            let assembler = ExamAssembler::new(
                &self.config,
                &self.repository,
                &self.assets,
                &self.random_vars,
            );
            let compilation = assembler.compile(&list.name, &list.questions)?;

            if !compilation.report.is_empty() {
                warn!(
                    "[考试 {}] ⚠️ {} 道题目未写入，详见 {}",
                    list.name,
                    compilation.report.len(),
                    self.report_writer.path()
                );
                stats.problem_questions += compilation.report.len();
            }
            self.report_writer.write(&list.name, &compilation.report)?;

            if self.config.persist_exams {
                self.exam_store.insert(compilation.exam)?;
                info!(
                    "[考试 {}] ✓ 考试记录已保存至 {}",
                    list.name,
                    self.exam_store.path().display()
                );
            } else {
                info!("[考试 {}] 测试模式，不保存考试记录", list.name);
            }
            stats.compiled += 1;
        }

        Ok(stats)
    }
}

/// 扫描考试清单目录
///
/// 每个 `*.txt` 文件是一份考试：文件名（不含扩展名）是考试名称，
/// 内容是以空白分隔的题目名称。按文件名排序。
pub fn load_exam_lists(folder_path: &str) -> AppResult<Vec<ExamList>> {
    let folder = PathBuf::from(folder_path);
    if !folder.exists() {
        return Err(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        }
        .into());
    }

    let entries = fs::read_dir(&folder).map_err(|source| FileError::ReadDirFailed {
        path: folder_path.to_string(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("txt"))
        .collect();
    files.sort();

    let mut lists = Vec::with_capacity(files.len());
    for path in files {
        lists.push(load_exam_list(&path)?);
    }
    Ok(lists)
}

fn load_exam_list(path: &Path) -> AppResult<ExamList> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::read_failed(path.display().to_string(), e))?;
    let name = path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    Ok(ExamList {
        name,
        questions: content.split_whitespace().map(str::to_string).collect(),
    })
}

/// 处理统计
#[derive(Debug, Default)]
struct ProcessingStats {
    compiled: usize,
    skipped: usize,
    problem_questions: usize,
    total: usize,
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 考试导出模式");
    info!(
        "📊 模式: {}",
        if config.persist_exams {
            "正式编译（保存考试记录）"
        } else {
            "测试编译（只生成 XML）"
        }
    );
    info!("🔀 打乱选项: {}", config.shuffle_answers);
    info!("{}", "=".repeat(60));
}

fn print_final_stats(stats: &ProcessingStats, config: &Config) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 已编译: {}/{}", stats.compiled, stats.total);
    info!("⏭️ 已跳过: {}", stats.skipped);
    if stats.problem_questions > 0 {
        error!("❌ 问题题目: {}", stats.problem_questions);
        info!("\n问题题目已记录至: {}", config.report_file);
    }
    info!("{}", "=".repeat(60));
    info!("\n导出目录: {}", config.exams_dir);
}
