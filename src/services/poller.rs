//! 提交轮询
//!
//! 反复调用 check 接口直到出现终态（SUCCESS / FAILURE）、超时或被取消。
//! 等待间隔从 `initial_interval` 开始翻倍，最大 `max_interval`。
//!
//! 单次 check 的网络错误或分类错误会直接终止轮询，不在这里重试；
//! 只有"仍在判题"才会进入下一轮。

use std::sync::Arc;
use tokio::time::{sleep, sleep_until, Instant};
use tracing::{debug, info};

use crate::clients::JudgeClient;
use crate::config::LeetCodeAuth;
use crate::error::{AppError, AppResult};
use crate::models::{PollPolicy, SubmissionId, SubmissionResult, VerdictState};
use crate::services::cancel::CancelToken;

/// 提交轮询器
pub struct SubmissionPoller {
    client: Arc<dyn JudgeClient>,
}

impl SubmissionPoller {
    pub fn new(client: Arc<dyn JudgeClient>) -> Self {
        Self { client }
    }

    /// 轮询直到得到判题结果
    ///
    /// # 参数
    /// - `submission_id`: submit 返回的提交 ID
    /// - `auth`: 登录凭据，只在本次调用期间借用
    /// - `policy`: 轮询策略（零值字段使用默认值）
    /// - `cancel`: 取消信号
    ///
    /// # 返回
    /// 终态的判题结果；超时返回 `TimedOut`，取消返回 `Cancelled`
    pub async fn poll(
        &self,
        submission_id: SubmissionId,
        auth: &LeetCodeAuth,
        policy: PollPolicy,
        cancel: &CancelToken,
    ) -> AppResult<SubmissionResult> {
        let policy = policy.normalized();
        let started = Instant::now();
        let deadline = started + policy.timeout;
        let mut interval = policy.initial_interval;
        let mut attempt: u32 = 0;

        if let Some(reason) = cancel.reason() {
            return Err(AppError::Cancelled { reason });
        }

        loop {
            attempt += 1;

            let result = tokio::select! {
                biased;
                reason = cancel.cancelled() => return Err(AppError::Cancelled { reason }),
                _ = sleep_until(deadline) => return Err(timed_out(submission_id, started)),
                checked = self.client.check_submission(submission_id, auth) => checked?,
            };

            match result.verdict_state() {
                VerdictState::Success | VerdictState::Failure => {
                    info!(
                        "✓ 判题完成: {} (第 {} 次查询, 用时 {} ms)",
                        result.status_message,
                        attempt,
                        started.elapsed().as_millis()
                    );
                    return Ok(result);
                }
                VerdictState::Missing => {
                    return Err(AppError::protocol("submission check", "missing state"));
                }
                VerdictState::Pending(state) => {
                    debug!(
                        "判题中: state={} (第 {} 次查询), {} ms 后重试",
                        state,
                        attempt,
                        interval.as_millis()
                    );
                }
            }

            tokio::select! {
                biased;
                reason = cancel.cancelled() => return Err(AppError::Cancelled { reason }),
                _ = sleep_until(deadline) => return Err(timed_out(submission_id, started)),
                _ = sleep(interval) => {}
            }

            interval = policy.next_interval(interval);
        }
    }
}

fn timed_out(submission_id: SubmissionId, started: Instant) -> AppError {
    AppError::TimedOut {
        submission_id: submission_id.get(),
        elapsed_ms: started.elapsed().as_millis(),
    }
}
