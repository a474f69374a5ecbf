//! In-process live notification channel.
//!
//! Connected sessions subscribe to a named group and receive every
//! notification event published to it. Delivery is at-most-once per
//! receiver; a lagging receiver loses events past the channel capacity
//! and a group with no receivers drops the event entirely.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use domain::models::NotificationEvent;
use domain::services::LiveChannel;
use tokio::sync::{broadcast, RwLock};

pub struct BroadcastLiveChannel {
    capacity: usize,
    groups: Arc<RwLock<HashMap<String, broadcast::Sender<NotificationEvent>>>>,
}

impl BroadcastLiveChannel {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            groups: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    async fn sender_for(&self, group: &str) -> broadcast::Sender<NotificationEvent> {
        let mut groups = self.groups.write().await;
        groups
            .entry(group.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }

    /// Subscribe a session to a group. The sender side is created on first
    /// use so subscribing and publishing can happen in either order.
    pub async fn subscribe(&self, group: &str) -> broadcast::Receiver<NotificationEvent> {
        self.sender_for(group).await.subscribe()
    }

    pub async fn receiver_count(&self, group: &str) -> usize {
        let groups = self.groups.read().await;
        groups.get(group).map_or(0, |s| s.receiver_count())
    }
}

#[async_trait]
impl LiveChannel for BroadcastLiveChannel {
    async fn publish(&self, group: &str, event: NotificationEvent) -> usize {
        let sender = self.sender_for(group).await;
        // send() fails only when nobody is listening
        sender.send(event).unwrap_or(0)
    }
}
