//! 取消信号
//!
//! 轮询等待和进行中的 HTTP 请求都要观察同一个信号，
//! 谁先完成谁生效。取消原因会原样传给调用方。

use std::sync::Arc;
use tokio::sync::watch;

/// 可克隆的取消令牌
#[derive(Clone, Debug)]
pub struct CancelToken {
    tx: Arc<watch::Sender<Option<String>>>,
    rx: watch::Receiver<Option<String>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(None);
        Self {
            tx: Arc::new(tx),
            rx,
        }
    }

    /// 发出取消；只有第一次的原因会被保留
    pub fn cancel(&self, reason: impl Into<String>) {
        let reason = reason.into();
        self.tx.send_if_modified(|current| {
            if current.is_none() {
                *current = Some(reason);
                true
            } else {
                false
            }
        });
    }

    /// 已取消时返回原因
    pub fn reason(&self) -> Option<String> {
        self.rx.borrow().clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// 等待取消，返回取消原因
    pub async fn cancelled(&self) -> String {
        let mut rx = self.rx.clone();
        loop {
            if let Some(reason) = rx.borrow_and_update().clone() {
                return reason;
            }
            // 发送端由令牌自己持有，changed() 不会因为关闭而失败
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
