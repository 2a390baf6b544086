use thiserror::Error;

/// 应用程序错误类型
///
/// 所有错误信息最终都会以 `error: <message>` 的形式输出给用户，
/// 因此任何变体的 Display 中都不能出现 session / csrftoken 的值。
#[derive(Debug, Error)]
pub enum AppError {
    /// 输入参数缺失或非法（本地校验，不会发起网络请求）
    #[error("{0}")]
    Validation(String),

    /// 评测站返回了 HTML 而不是 JSON（通常是反爬虫页面）
    #[error("leetcode {operation}: unexpected html response (status {status}); leetcode may be blocking requests")]
    AntiAutomation { operation: String, status: u16 },

    /// 非 2xx 响应
    #[error("leetcode {operation}: status {status}: {snippet}")]
    Status {
        operation: String,
        status: u16,
        snippet: String,
    },

    /// 协议层面的逻辑错误（GraphQL errors、submit 的 error 字段等）
    #[error("leetcode {operation}: {message}")]
    Protocol { operation: String, message: String },

    /// 题目不存在
    #[error("problem not found: {slug}")]
    NotFound { slug: String },

    /// 操作需要登录凭据
    #[error("{0}")]
    AuthRequired(String),

    /// 轮询超时
    #[error("timed out after {elapsed_ms} ms waiting for submission {submission_id}")]
    TimedOut { submission_id: i64, elapsed_ms: u128 },

    /// 被调用方取消
    #[error("cancelled: {reason}")]
    Cancelled { reason: String },

    /// 工作区或解答文件已存在
    #[error("solution already exists at {path}")]
    FileConflict { path: String },

    /// 其他文件系统错误
    #[error("{context}: {source}")]
    Filesystem {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// 配置文件不存在
    #[error("config not found at {path}")]
    ConfigNotFound { path: String },

    /// 配置文件权限过宽
    #[error("config file {path} has insecure permissions ({mode:#o}); run: chmod 600 {path}")]
    ConfigInsecure { path: String, mode: u32 },

    /// 配置文件解析/序列化失败
    #[error("{0}")]
    ConfigFormat(String),

    /// 网络传输失败
    #[error("leetcode {operation} request failed: {source}")]
    Transport {
        operation: String,
        #[source]
        source: reqwest::Error,
    },

    /// 响应体 JSON 解码失败
    #[error("decode leetcode {operation} response: {source}")]
    Decode {
        operation: String,
        #[source]
        source: serde_json::Error,
    },

    /// 题面渲染失败
    #[error("render header: {0}")]
    Render(String),

    /// 外部编辑器运行失败
    #[error("run editor {command:?}: {message}")]
    Editor { command: String, message: String },

    /// 尚未实现的功能
    #[error("{feature}: not implemented")]
    NotImplemented { feature: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn protocol(operation: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Protocol {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn filesystem(context: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Filesystem {
            context: context.into(),
            source,
        }
    }

    pub fn not_implemented(feature: impl Into<String>) -> Self {
        AppError::NotImplemented {
            feature: feature.into(),
        }
    }

    /// 是否为"文件已存在"（在 fetch 流程中可恢复）
    pub fn is_file_conflict(&self) -> bool {
        matches!(self, AppError::FileConflict { .. })
    }

    pub fn is_config_not_found(&self) -> bool {
        matches!(self, AppError::ConfigNotFound { .. })
    }

    pub fn is_not_implemented(&self) -> bool {
        matches!(self, AppError::NotImplemented { .. })
    }

    pub fn is_anti_automation(&self) -> bool {
        matches!(self, AppError::AntiAutomation { .. })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
