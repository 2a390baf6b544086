use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// 默认轮询参数
pub const DEFAULT_POLL_INITIAL_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_POLL_MAX_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(120);

/// 提交请求，四个字段都必须非空
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitRequest {
    pub title_slug: String,
    pub question_id: String,
    pub lang_slug: String,
    pub source_code: String,
}

/// submit 接口返回的提交 ID，只用于后续的 check 调用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SubmissionId(i64);

impl SubmissionId {
    /// 非正数不是合法的提交 ID
    pub fn new(raw: i64) -> Option<Self> {
        (raw > 0).then_some(Self(raw))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 一次 check 调用（或最终轮询）的结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionResult {
    pub state: String,
    pub status_message: String,
    pub runtime: String,
    pub memory: String,
    pub compile_error: String,
    pub runtime_error: String,
}

/// 判题状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerdictState {
    /// 仍在判题（任何非终态的 state 值）
    Pending(String),
    Success,
    Failure,
    /// 响应中没有 state 字段
    Missing,
}

impl SubmissionResult {
    pub fn verdict_state(&self) -> VerdictState {
        match self.state.trim() {
            "" => VerdictState::Missing,
            "SUCCESS" => VerdictState::Success,
            "FAILURE" => VerdictState::Failure,
            other => VerdictState::Pending(other.to_string()),
        }
    }
}

/// 轮询策略，任何字段为零时使用默认值
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollPolicy {
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub timeout: Duration,
}

impl PollPolicy {
    /// 填充默认值；`max_interval` 不小于 `initial_interval`
    pub fn normalized(self) -> Self {
        let initial_interval = if self.initial_interval.is_zero() {
            DEFAULT_POLL_INITIAL_INTERVAL
        } else {
            self.initial_interval
        };
        let mut max_interval = if self.max_interval.is_zero() {
            DEFAULT_POLL_MAX_INTERVAL
        } else {
            self.max_interval
        };
        if max_interval < initial_interval {
            max_interval = initial_interval;
        }
        let timeout = if self.timeout.is_zero() {
            DEFAULT_POLL_TIMEOUT
        } else {
            self.timeout
        };
        Self {
            initial_interval,
            max_interval,
            timeout,
        }
    }

    /// 下一次等待间隔：翻倍，封顶
    pub fn next_interval(&self, current: Duration) -> Duration {
        current.saturating_mul(2).min(self.max_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_id_rejects_non_positive() {
        assert!(SubmissionId::new(0).is_none());
        assert!(SubmissionId::new(-5).is_none());
        assert_eq!(SubmissionId::new(123).unwrap().get(), 123);
    }

    #[test]
    fn test_policy_defaults() {
        let p = PollPolicy::default().normalized();
        assert_eq!(p.initial_interval, Duration::from_secs(1));
        assert_eq!(p.max_interval, Duration::from_secs(5));
        assert_eq!(p.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_policy_raises_max_to_initial() {
        let p = PollPolicy {
            initial_interval: Duration::from_secs(3),
            max_interval: Duration::from_secs(1),
            timeout: Duration::ZERO,
        }
        .normalized();
        assert_eq!(p.max_interval, Duration::from_secs(3));
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let p = PollPolicy::default().normalized();
        let mut interval = p.initial_interval;
        let mut seen = Vec::new();
        for _ in 0..5 {
            interval = p.next_interval(interval);
            seen.push(interval.as_secs());
        }
        assert_eq!(seen, vec![2, 4, 5, 5, 5]);
    }

    #[test]
    fn test_verdict_state() {
        let mut r = SubmissionResult::default();
        assert_eq!(r.verdict_state(), VerdictState::Missing);
        r.state = "STARTED".into();
        assert_eq!(r.verdict_state(), VerdictState::Pending("STARTED".into()));
        r.state = "SUCCESS".into();
        assert_eq!(r.verdict_state(), VerdictState::Success);
        r.state = "FAILURE".into();
        assert_eq!(r.verdict_state(), VerdictState::Failure);
    }
}
