use anyhow::Result;
use exam_quiz_export::utils::logging;
use exam_quiz_export::{App, Config};

fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置：优先使用命令行给出的 TOML 文件，否则读取环境变量
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::from_env(),
    };

    // 初始化并运行应用
    App::initialize(config)?.run()?;

    Ok(())
}
