//! 外部编辑器 - 业务能力层
//!
//! 启动编辑器进程打开解答文件，阻塞直到进程退出。

use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::info;

use crate::error::{AppError, AppResult};

const DEFAULT_EDITOR: &str = "vim";

/// 编辑器能力
#[async_trait]
pub trait EditorRunner: Send + Sync {
    /// 打开文件并等待编辑器退出
    async fn open_file(&self, editor_cmd: &str, path: &Path) -> AppResult<()>;
}

/// 通过子进程运行编辑器
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEditor;

impl ProcessEditor {
    pub fn new() -> Self {
        Self
    }
}

/// 编辑器命令：显式配置 > $EDITOR > vim
pub fn resolve_editor(configured: &str) -> String {
    let configured = configured.trim();
    if !configured.is_empty() {
        return configured.to_string();
    }
    std::env::var("EDITOR")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
}

#[async_trait]
impl EditorRunner for ProcessEditor {
    async fn open_file(&self, editor_cmd: &str, path: &Path) -> AppResult<()> {
        if path.as_os_str().is_empty() {
            return Err(AppError::validation("file path is required"));
        }

        let command = resolve_editor(editor_cmd);
        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| AppError::validation("editor command is empty"))?;

        info!("📝 打开编辑器: {} {}", command, path.display());

        // stdio 默认继承自父进程；Ctrl-C 丢弃 future 时一并结束编辑器进程
        let status = Command::new(program)
            .args(parts)
            .arg(path)
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| AppError::Editor {
                command: command.clone(),
                message: e.to_string(),
            })?;

        if !status.success() {
            return Err(AppError::Editor {
                command,
                message: status.to_string(),
            });
        }
        Ok(())
    }
}
