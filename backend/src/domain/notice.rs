//! Toast-style notices surfaced to the dashboard.
//!
//! Every operation outcome, success or failure, posts a transient notice.
//! The hub fans notices out to however many dashboard sessions are
//! connected; posting never blocks and never fails the operation that
//! produced the notice.

use serde::Serialize;
use tokio::sync::broadcast;
use utoipa::ToSchema;

const NOTICE_CHANNEL_CAPACITY: usize = 100;

/// Visual severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// One transient toast message.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Fan-out hub for dashboard notices.
#[derive(Clone)]
pub struct NoticeHub {
    tx: broadcast::Sender<Notice>,
}

impl NoticeHub {
    /// Create a hub with the default buffer.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(NOTICE_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Post a notice; dropped silently when nobody is listening.
    pub fn post(&self, level: NoticeLevel, message: impl Into<String>) {
        let _ = self.tx.send(Notice {
            level,
            message: message.into(),
        });
    }

    /// Post an informational notice.
    pub fn info(&self, message: impl Into<String>) {
        self.post(NoticeLevel::Info, message);
    }

    /// Post a success notice.
    pub fn success(&self, message: impl Into<String>) {
        self.post(NoticeLevel::Success, message);
    }

    /// Post a warning notice.
    pub fn warning(&self, message: impl Into<String>) {
        self.post(NoticeLevel::Warning, message);
    }

    /// Post an error notice.
    pub fn error(&self, message: impl Into<String>) {
        self.post(NoticeLevel::Error, message);
    }

    /// Subscribe a new listener.
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }
}

impl Default for NoticeHub {
    fn default() -> Self {
        Self::new()
    }
}
