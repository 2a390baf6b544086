//! 命令分发 - 编排层
//!
//! 解析命令行 → 组装各项能力 → 调用流程 → 把错误映射成退出码。

use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::clients::{ClientOptions, LeetCodeClient};
use crate::config::{FileStore, Settings};
use crate::error::{AppError, AppResult};
use crate::orchestrator::args::{Cli, Command};
use crate::orchestrator::config_cmd::run_config;
use crate::orchestrator::exit_codes;
use crate::services::{CancelToken, FsWorkspace, HtmlRenderer, Printer, ProcessEditor, StdPrinter};
use crate::utils::logging::log_command_start;
use crate::workflow::{Collaborators, FetchOptions, SolutionFlow, SolveOptions, SubmitOptions};

/// 运行一次命令行调用，返回进程退出码
pub async fn run<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => exit_codes::SUCCESS,
                _ => exit_codes::USAGE,
            };
            let _ = e.print();
            return code;
        }
    };

    let printer = Arc::new(StdPrinter::stdio(cli.cmd.json()));
    let cancel = CancelToken::new();
    spawn_interrupt_listener(cancel.clone());

    log_command_start(cli.cmd.name(), cli.cmd.problem_key());
    let result = tokio::select! {
        biased;
        reason = cancel.cancelled() => Err(AppError::Cancelled { reason }),
        result = dispatch(cli.cmd, printer.clone(), cancel.clone()) => result,
    };

    match result {
        Ok(()) => exit_codes::SUCCESS,
        Err(err) => {
            let _ = printer.print_error(&err);
            if err.is_not_implemented() {
                exit_codes::NOT_IMPLEMENTED
            } else {
                exit_codes::FAILURE
            }
        }
    }
}

/// Ctrl-C 只发出取消信号，由正在运行的流程决定如何退出
fn spawn_interrupt_listener(cancel: CancelToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                debug!("收到中断信号");
                cancel.cancel("interrupted");
            }
            Err(e) => warn!("⚠️ 无法监听中断信号: {}", e),
        }
    });
}

async fn dispatch(cmd: Command, printer: Arc<StdPrinter>, cancel: CancelToken) -> AppResult<()> {
    let settings = Settings::from_env()?;
    debug!("配置路径: {}", settings.config_path.display());
    let store = FileStore::new(settings.config_path.clone());

    if let Command::Config { cmd } = &cmd {
        return run_config(cmd, &store, printer.as_ref()).await;
    }

    let judge = LeetCodeClient::new(ClientOptions {
        base_url: settings.base_url.clone(),
        user_agent: settings.user_agent.clone(),
    });
    debug!("评测站: {}", judge.base_url());
    let flow = SolutionFlow::new(Collaborators {
        config_store: Arc::new(store),
        judge: Arc::new(judge),
        workspace: Arc::new(FsWorkspace::new()),
        renderer: Arc::new(HtmlRenderer::new()?),
        editor: Arc::new(ProcessEditor::new()),
        printer: printer as Arc<dyn Printer>,
    })
    .with_cancel(cancel);

    match cmd {
        Command::Fetch(a) => flow
            .fetch(&FetchOptions {
                problem_key: a.problem_key,
                lang: a.lang,
            })
            .await
            .map(|_| ()),
        Command::Solve(a) => flow
            .solve(&SolveOptions {
                problem_key: a.problem_key,
                lang: a.lang,
                submit: a.submit,
            })
            .await
            .map(|_| ()),
        Command::Submit(a) => {
            flow.submit(&SubmitOptions {
                problem_key: a.problem_key,
                lang: a.lang,
                file: a.file,
            })
            .await
        }
        Command::Config { .. } => Ok(()),
    }
}
