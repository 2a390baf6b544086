//! `vleet config init|show`

use tracing::info;

use crate::config::{Config, ConfigStore, FileStore, LeetCodeAuth};
use crate::error::{AppError, AppResult};
use crate::models::DEFAULT_LANG;
use crate::orchestrator::args::{ConfigCommand, ConfigInitArgs};
use crate::services::editor::resolve_editor;
use crate::services::Printer;

pub async fn run_config(cmd: &ConfigCommand, store: &FileStore, printer: &dyn Printer) -> AppResult<()> {
    match cmd {
        ConfigCommand::Init(args) => init(args, store, printer).await,
        ConfigCommand::Show => show(store, printer).await,
    }
}

/// 写入新的配置文件，凭据留空
async fn init(args: &ConfigInitArgs, store: &FileStore, printer: &dyn Printer) -> AppResult<()> {
    if store.exists().await? && !args.force {
        return Err(AppError::validation(format!(
            "config already exists at {} (use --force to overwrite)",
            store.path().display()
        )));
    }

    let default_lang = match args.default_lang.trim() {
        "" => DEFAULT_LANG.to_string(),
        lang => lang.to_string(),
    };
    let config = Config {
        editor: resolve_editor(&args.editor),
        default_lang,
        leetcode: LeetCodeAuth::default(),
    };
    store.save(&config).await?;
    info!("✓ 配置文件已写入: {}", store.path().display());

    printer.print_notice(&format!("wrote config: {}", store.path().display()))?;
    printer.print_notice("note: edit the file to set leetcode.session and leetcode.csrftoken")
}

/// 显示配置，凭据只显示是否已设置
async fn show(store: &FileStore, printer: &dyn Printer) -> AppResult<()> {
    let config = match store.load().await {
        Ok(config) => config,
        Err(AppError::ConfigNotFound { path }) => {
            return Err(AppError::validation(format!(
                "config not found at {} (run: vleet config init)",
                path
            )))
        }
        Err(e) => return Err(e),
    };

    let mark = |set: bool| if set { "(set)" } else { "(not set)" };
    let lines = [
        format!("path: {}", store.path().display()),
        format!("editor: {}", config.editor),
        format!("default_lang: {}", config.default_lang),
        format!("leetcode.session: {}", mark(config.leetcode.has_session())),
        format!("leetcode.csrftoken: {}", mark(config.leetcode.has_csrftoken())),
    ];
    for line in &lines {
        printer.print_notice(line)?;
    }
    Ok(())
}
