//! Notification fan-out.
//!
//! Delivers a persisted notification to every recipient channel: one
//! event to the live broadcast group, one push per registered token.
//! Delivery runs off the ingestion path and never propagates failure
//! upstream; each token fails independently and there are no retries.

use std::collections::HashSet;
use std::sync::Arc;

use domain::models::{Device, Notification, NotificationEvent, PushToken};
use domain::services::{AlertPush, LiveChannel, PushService, TelemetryStore};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::config::FanoutConfig;

/// What one dispatch actually delivered. Partial success is normal:
/// zero live receivers or a few dead tokens do not fail the dispatch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub live_receivers: usize,
    pub push_sent: usize,
    pub push_failed: usize,
}

pub struct FanoutDispatcher {
    store: Arc<dyn TelemetryStore>,
    live: Arc<dyn LiveChannel>,
    push: Arc<dyn PushService>,
    config: FanoutConfig,
}

impl FanoutDispatcher {
    pub fn new(
        store: Arc<dyn TelemetryStore>,
        live: Arc<dyn LiveChannel>,
        push: Arc<dyn PushService>,
        config: FanoutConfig,
    ) -> Self {
        Self {
            store,
            live,
            push,
            config,
        }
    }

    /// Deliver one notification to live subscribers and push tokens.
    pub async fn dispatch(&self, notification: &Notification, device: &Device) -> DispatchOutcome {
        let event = NotificationEvent::from_notification(notification, device);

        let live_receivers = self.live.publish(&self.config.live_group, event).await;
        metrics::counter!("fanout_live_published_total").increment(1);

        let tokens = match self.store.list_push_tokens(device.id).await {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(
                    notification_id = notification.id,
                    device_id = device.id,
                    error = %e,
                    "Failed to load push tokens, skipping push delivery"
                );
                return DispatchOutcome {
                    live_receivers,
                    ..Default::default()
                };
            }
        };

        // The same physical token can be registered for several devices
        let unique_tokens: HashSet<String> = tokens.into_iter().map(|t| t.token).collect();

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_pushes));
        let mut deliveries = JoinSet::new();

        for token in unique_tokens {
            let push = self.build_push(notification, device);
            let service = Arc::clone(&self.push);
            let semaphore = Arc::clone(&semaphore);
            let notification_id = notification.id;

            deliveries.spawn(async move {
                // Closed only if the dispatcher is dropped mid-flight
                let Ok(_permit) = semaphore.acquire().await else {
                    return false;
                };

                let result = service.send_alert(&token, push).await;
                if !result.is_sent() {
                    warn!(
                        token_prefix = %PushToken::prefix_of(&token),
                        notification_id,
                        result = ?result,
                        "Push delivery failed"
                    );
                }
                result.is_sent()
            });
        }

        let mut push_sent = 0;
        let mut push_failed = 0;
        while let Some(joined) = deliveries.join_next().await {
            match joined {
                Ok(true) => push_sent += 1,
                _ => push_failed += 1,
            }
        }

        metrics::counter!("fanout_push_sent_total").increment(push_sent as u64);
        metrics::counter!("fanout_push_failed_total").increment(push_failed as u64);

        info!(
            notification_id = notification.id,
            device_id = device.id,
            live_receivers,
            push_sent,
            push_failed,
            "Notification dispatched"
        );

        DispatchOutcome {
            live_receivers,
            push_sent,
            push_failed,
        }
    }

    fn build_push(&self, notification: &Notification, device: &Device) -> AlertPush {
        AlertPush {
            title: notification.title.clone(),
            body: format!("{}: {}", device.location_label(), notification.message),
            kind: notification.kind,
            priority: notification.priority,
            data: serde_json::json!({
                "notificationId": notification.id,
                "deviceId": device.id,
                "deviceName": device.name,
                "room": device.room_number,
                "floor": device.floor_number,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::models::{AlertSnapshot, NotificationType, PushToken};
    use domain::services::{MemoryTelemetryStore, MockPushService};
    use uuid::Uuid;

    fn device() -> Device {
        Device {
            id: 3,
            device_code: Some("DSP-003".to_string()),
            name: "Lobby Dispenser".to_string(),
            floor_number: 1,
            room_number: "101".to_string(),
            consumable_type: "tissue".to_string(),
            meter_capacity: 500,
            refer_value: 450,
            created_at: Utc::now(),
        }
    }

    fn notification() -> Notification {
        Notification {
            id: 11,
            device_id: 3,
            reading_id: 42,
            kind: NotificationType::Empty,
            title: "Empty Alert".to_string(),
            message: "Container is empty - needs immediate refill!".to_string(),
            priority: 90,
            snapshot: AlertSnapshot {
                fill_alert: Some("EMPTY".to_string()),
                tamper: false,
                battery_percentage: Some(80.0),
                power_status: Some("on".to_string()),
            },
            is_read: false,
            created_at: Utc::now(),
        }
    }

    fn token(value: &str) -> PushToken {
        PushToken {
            id: 0,
            user_id: Uuid::new_v4(),
            device_id: Some(3),
            token: value.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn dispatcher_with(store: MemoryTelemetryStore, push: MockPushService) -> FanoutDispatcher {
        let store: Arc<dyn TelemetryStore> = Arc::new(store);
        let live: Arc<dyn LiveChannel> = Arc::new(crate::services::BroadcastLiveChannel::new(16));
        let push: Arc<dyn PushService> = Arc::new(push);
        FanoutDispatcher::new(store, live, push, FanoutConfig::default())
    }

    #[tokio::test]
    async fn test_partial_push_failure_delivers_the_rest() {
        let store = MemoryTelemetryStore::new();
        store.insert_device(device());
        for i in 1..=5 {
            store.insert_token(token(&format!("token-{i}")));
        }

        let push = MockPushService::failing_for(["token-1", "token-3", "token-5"]);
        let dispatcher = dispatcher_with(store, push);

        let outcome = dispatcher.dispatch(&notification(), &device()).await;

        assert_eq!(outcome.push_sent, 2);
        assert_eq!(outcome.push_failed, 3);
    }

    #[tokio::test]
    async fn test_multibyte_token_failure_is_logged_not_fatal() {
        let store = MemoryTelemetryStore::new();
        store.insert_device(device());

        let multibyte = format!("a{}", "α".repeat(12));
        store.insert_token(token(&multibyte));
        store.insert_token(token("healthy-token"));

        let push = MockPushService::failing_for([multibyte.as_str()]);
        let dispatcher = dispatcher_with(store, push);

        let outcome = dispatcher.dispatch(&notification(), &device()).await;

        assert_eq!(outcome.push_sent, 1);
        assert_eq!(outcome.push_failed, 1);
    }

    #[tokio::test]
    async fn test_duplicate_tokens_get_one_delivery() {
        let store = MemoryTelemetryStore::new();
        store.insert_device(device());
        store.insert_token(token("shared-token"));
        store.insert_token(PushToken {
            device_id: None,
            ..token("shared-token")
        });

        let dispatcher = dispatcher_with(store, MockPushService::new());
        let outcome = dispatcher.dispatch(&notification(), &device()).await;

        assert_eq!(outcome.push_sent, 1);
        assert_eq!(outcome.push_failed, 0);
    }

    #[tokio::test]
    async fn test_live_receivers_counted() {
        let store = MemoryTelemetryStore::new();
        store.insert_device(device());

        let live = Arc::new(crate::services::BroadcastLiveChannel::new(16));
        let mut rx = live.subscribe("notifications").await;

        let store: Arc<dyn TelemetryStore> = Arc::new(store);
        let live_seam: Arc<dyn LiveChannel> = live.clone();
        let push: Arc<dyn PushService> = Arc::new(MockPushService::new());
        let dispatcher = FanoutDispatcher::new(store, live_seam, push, FanoutConfig::default());

        let outcome = dispatcher.dispatch(&notification(), &device()).await;

        assert_eq!(outcome.live_receivers, 1);
        let event = rx.recv().await.unwrap();
        assert_eq!(event.id, 11);
        assert_eq!(event.kind, NotificationType::Empty);
        assert!(!event.is_read);
    }
}
