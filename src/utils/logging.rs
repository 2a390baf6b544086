//! 日志工具模块
//!
//! 提供日志格式化的辅助函数

use tracing::info;

/// 记录命令开始
///
/// # 参数
/// - `command`: 子命令名称
/// - `problem_key`: 题目 key，config 命令为空
pub fn log_command_start(command: &str, problem_key: &str) {
    if problem_key.is_empty() {
        info!("🚀 vleet {}", command);
    } else {
        info!("🚀 vleet {} {}", command, problem_key);
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
