//! Push delivery target model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A push-capable endpoint registered by a recipient.
///
/// `device_id = None` means the recipient subscribed to the whole fleet;
/// otherwise the token only receives alerts for that device. Registration
/// is idempotent on the token string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushToken {
    pub id: i64,
    pub user_id: Uuid,
    pub device_id: Option<i64>,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PushToken {
    /// Loggable prefix; full tokens never appear in logs.
    pub fn token_prefix(&self) -> &str {
        Self::prefix_of(&self.token)
    }

    /// Truncates an opaque token to at most 20 bytes for logging,
    /// backing off to the nearest char boundary.
    pub fn prefix_of(token: &str) -> &str {
        let mut end = token.len().min(20);
        while !token.is_char_boundary(end) {
            end -= 1;
        }
        &token[..end]
    }
}
