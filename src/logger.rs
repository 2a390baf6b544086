//! 日志初始化
//!
//! 日志只写到 stderr，stdout 留给命令输出（`--json` 模式下必须是纯 JSON）。
//! 默认级别为 `warn`，可通过 `RUST_LOG` 调整，例如 `RUST_LOG=vleet=debug`。

use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "warn";

/// 初始化全局日志订阅者
///
/// 重复调用是安全的，第二次起不做任何事。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
