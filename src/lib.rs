//! # vleet
//!
//! 在本地终端里刷 LeetCode：拉取题目生成解答文件，用自己的编辑器写代码，然后提交并等待判题结果。
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 评测站协议客户端，每个方法只发一次请求
//! - `LeetCodeClient` - GraphQL 查询题目、提交代码、查询判题状态
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `FsWorkspace` - 工作区和解答文件（只创建，不覆盖）
//! - `HtmlRenderer` - 题面 HTML → 注释块
//! - `ProcessEditor` - 外部编辑器
//! - `SubmissionPoller` - 带退避、超时和取消的判题轮询
//! - `StdPrinter` - 文本 / JSON 输出
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义每个命令的完整处理流程
//! - `SolutionFlow` - fetch / solve / submit
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/` - 命令行解析、依赖组装、退出码
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{ClientOptions, JudgeClient, LeetCodeClient};
pub use config::{Config, ConfigStore, FileStore, LeetCodeAuth, Settings};
pub use error::{AppError, AppResult};
pub use models::{PollPolicy, Question, SubmissionId, SubmissionResult, SubmitRequest};
pub use orchestrator::run;
pub use services::CancelToken;
pub use workflow::{Collaborators, SolutionFlow};
