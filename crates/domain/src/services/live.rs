//! Live operator session seam.

use crate::models::NotificationEvent;

/// Fire-and-forget publish to a broadcast group of connected operator
/// sessions. No delivery receipt; sessions not connected at publish time
/// receive nothing and must fetch persisted notifications on reconnect.
#[async_trait::async_trait]
pub trait LiveChannel: Send + Sync {
    /// Publishes one event to a group; returns the number of sessions that
    /// received it (0 when nobody is listening).
    async fn publish(&self, group: &str, event: NotificationEvent) -> usize;
}
