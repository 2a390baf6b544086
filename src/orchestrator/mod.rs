//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 命令行入口：解析参数、组装依赖、调用流程层、输出错误并决定退出码。
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator (解析命令行，组装依赖)
//!     ↓
//! workflow::SolutionFlow (fetch / solve / submit)
//!     ↓
//! services (能力层：workspace / render / editor / poller / output)
//!     ↓
//! clients (评测站协议客户端)
//! ```

pub mod args;
pub mod config_cmd;
pub mod dispatch;
pub mod exit_codes;

pub use args::{Cli, Command, ConfigCommand};
pub use dispatch::run;
