//! Push delivery seam.

use std::collections::HashSet;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::models::{NotificationType, PushToken};

/// One push message addressed to a single token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertPush {
    pub title: String,
    pub body: String,
    pub kind: NotificationType,
    pub priority: i32,
    /// Structured payload forwarded for client-side routing and styling.
    pub data: serde_json::Value,
}

/// Result of one delivery attempt. Failures are terminal for the
/// token/notification pair; the engine performs no retries.
#[derive(Debug, Clone)]
pub enum PushResult {
    Sent,
    /// The provider rejected the token; the recipient should re-register.
    InvalidToken,
    Failed(String),
}

impl PushResult {
    pub fn is_sent(&self) -> bool {
        matches!(self, PushResult::Sent)
    }
}

/// Push delivery service seam.
#[async_trait::async_trait]
pub trait PushService: Send + Sync {
    /// Delivers one message to one token, best effort.
    async fn send_alert(&self, token: &str, push: AlertPush) -> PushResult;
}

/// Mock push service for development and testing.
///
/// Records every delivered token; tokens put on the failure list are
/// rejected, which lets tests exercise partial fan-out failure.
#[derive(Debug, Default)]
pub struct MockPushService {
    fail_tokens: HashSet<String>,
    sent: Mutex<Vec<String>>,
}

impl MockPushService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fail_tokens: tokens.into_iter().map(Into::into).collect(),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Tokens successfully delivered to so far.
    pub fn sent_tokens(&self) -> Vec<String> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl PushService for MockPushService {
    async fn send_alert(&self, token: &str, push: AlertPush) -> PushResult {
        if self.fail_tokens.contains(token) {
            tracing::warn!(
                token_prefix = %PushToken::prefix_of(token),
                kind = %push.kind,
                "Mock push service simulating failure"
            );
            return PushResult::Failed("Simulated failure".to_string());
        }

        if let Ok(mut sent) = self.sent.lock() {
            sent.push(token.to_string());
        }

        tracing::info!(
            token_prefix = %PushToken::prefix_of(token),
            kind = %push.kind,
            title = %push.title,
            "Mock: Would send push notification"
        );

        PushResult::Sent
    }
}
