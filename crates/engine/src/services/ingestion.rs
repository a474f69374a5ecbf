//! Telemetry ingestion pipeline.
//!
//! One device sample travels: validate, resolve device, persist the
//! reading, classify, materialize notifications, persist each draft
//! (replays dedup at the store), then hand every newly created
//! notification to the fan-out dispatcher off this path.

use std::sync::Arc;

use domain::alerting::{materialize, thresholds::normalize_battery, Classifier, NormalizedReading};
use domain::models::{NewReading, NotificationType, RawSample};
use domain::services::TelemetryStore;
use tracing::{debug, info};
use validator::Validate;

use crate::error::IngestError;
use crate::services::dispatcher::FanoutDispatcher;

/// What one accepted sample produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestSummary {
    pub reading_id: i64,
    /// Notification types created for this reading, in priority order.
    pub notifications: Vec<NotificationType>,
}

pub struct IngestionService {
    store: Arc<dyn TelemetryStore>,
    classifier: Classifier,
    dispatcher: Arc<FanoutDispatcher>,
}

impl IngestionService {
    pub fn new(
        store: Arc<dyn TelemetryStore>,
        classifier: Classifier,
        dispatcher: Arc<FanoutDispatcher>,
    ) -> Self {
        Self {
            store,
            classifier,
            dispatcher,
        }
    }

    /// Ingest one raw sample. Storage failures abort and surface;
    /// delivery failures never do.
    pub async fn ingest(&self, sample: RawSample) -> Result<IngestSummary, IngestError> {
        sample
            .validate()
            .map_err(|e| IngestError::Validation(e.to_string()))?;

        let device = self
            .store
            .find_device(sample.device_id)
            .await?
            .ok_or(IngestError::DeviceNotFound(sample.device_id))?;

        let reading = self
            .store
            .create_reading(NewReading {
                device_id: sample.device_id,
                fill_alert: sample.fill_alert,
                count: sample.count,
                refer_val: sample.refer_val,
                tamper: sample.tamper,
                total_usage: sample.total_usage,
                battery_percentage: normalize_battery(sample.battery_percentage.as_deref()),
                power_status: sample.power_status,
                device_timestamp: sample.device_timestamp,
            })
            .await?;

        let normalized = NormalizedReading::from_reading(&reading);
        let conditions = self.classifier.classify(&normalized);
        let drafts = materialize(&conditions, &normalized, &device);

        debug!(
            device_id = device.id,
            reading_id = reading.id,
            conditions = ?conditions,
            drafts = drafts.len(),
            "Sample classified"
        );

        let mut created_types = Vec::new();
        for draft in &drafts {
            let Some(notification) = self.store.create_notification_if_absent(draft).await? else {
                debug!(
                    reading_id = reading.id,
                    kind = %draft.kind,
                    "Notification already exists, skipping"
                );
                continue;
            };

            created_types.push(notification.kind);

            let dispatcher = Arc::clone(&self.dispatcher);
            let device = device.clone();
            tokio::spawn(async move {
                dispatcher.dispatch(&notification, &device).await;
            });
        }

        if !created_types.is_empty() {
            info!(
                device_id = device.id,
                reading_id = reading.id,
                notifications = ?created_types,
                "Notifications created"
            );
        }

        Ok(IngestSummary {
            reading_id: reading.id,
            notifications: created_types,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::models::Device;
    use domain::services::{LiveChannel, MemoryTelemetryStore, MockPushService, PushService};

    use crate::config::FanoutConfig;
    use crate::services::BroadcastLiveChannel;

    fn device(id: i64) -> Device {
        Device {
            id,
            device_code: None,
            name: format!("Dispenser {id}"),
            floor_number: 2,
            room_number: "204".to_string(),
            consumable_type: "tissue".to_string(),
            meter_capacity: 500,
            refer_value: 450,
            created_at: Utc::now(),
        }
    }

    fn sample(device_id: i64) -> RawSample {
        RawSample {
            device_id,
            device_timestamp: Some("2026-08-29T10:00:00".to_string()),
            fill_alert: None,
            count: 120,
            refer_val: 450,
            total_usage: Some(330),
            tamper: Some("false".to_string()),
            battery_percentage: Some("80".to_string()),
            power_status: Some("on".to_string()),
        }
    }

    fn service(store: Arc<MemoryTelemetryStore>) -> IngestionService {
        let store: Arc<dyn TelemetryStore> = store;
        let live: Arc<dyn LiveChannel> = Arc::new(BroadcastLiveChannel::new(16));
        let push: Arc<dyn PushService> = Arc::new(MockPushService::new());
        let dispatcher = Arc::new(FanoutDispatcher::new(
            store.clone(),
            live,
            push,
            FanoutConfig::default(),
        ));
        IngestionService::new(store, Classifier::default(), dispatcher)
    }

    #[tokio::test]
    async fn test_unknown_device_is_rejected() {
        let store = Arc::new(MemoryTelemetryStore::new());
        let result = service(store).ingest(sample(99)).await;
        assert!(matches!(result, Err(IngestError::DeviceNotFound(99))));
    }

    #[tokio::test]
    async fn test_normal_sample_creates_no_notifications() {
        let store = Arc::new(MemoryTelemetryStore::new());
        store.insert_device(device(1));

        let summary = service(Arc::clone(&store)).ingest(sample(1)).await.unwrap();

        assert!(summary.notifications.is_empty());
        assert_eq!(store.readings().len(), 1);
        assert!(store.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_low_battery_and_power_off_combine() {
        let store = Arc::new(MemoryTelemetryStore::new());
        store.insert_device(device(1));

        let mut sample = sample(1);
        sample.battery_percentage = Some("5".to_string());
        sample.power_status = Some("OFF".to_string());

        let summary = service(Arc::clone(&store)).ingest(sample).await.unwrap();

        assert_eq!(summary.notifications, vec![NotificationType::BatteryPowerOff]);
        let stored = store.notifications();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].priority, 110);
    }

    #[tokio::test]
    async fn test_low_fill_with_low_battery_creates_both() {
        let store = Arc::new(MemoryTelemetryStore::new());
        store.insert_device(device(1));

        let mut sample = sample(1);
        sample.fill_alert = Some("LOW".to_string());
        sample.battery_percentage = Some("15".to_string());

        let summary = service(Arc::clone(&store)).ingest(sample).await.unwrap();

        assert_eq!(
            summary.notifications,
            vec![NotificationType::Low, NotificationType::BatteryLow]
        );
    }

    #[tokio::test]
    async fn test_stored_notification_preserves_draft_fields() {
        let store = Arc::new(MemoryTelemetryStore::new());
        store.insert_device(device(1));

        let mut sample = sample(1);
        sample.tamper = Some("true".to_string());

        service(Arc::clone(&store)).ingest(sample).await.unwrap();

        let stored = store.notifications();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].kind, NotificationType::Tamper);
        assert_eq!(stored[0].priority, 100);
        assert!(stored[0].snapshot.tamper);
        assert_eq!(stored[0].snapshot.battery_percentage, Some(80.0));
        assert_eq!(stored[0].snapshot.power_status.as_deref(), Some("on"));
    }

    #[tokio::test]
    async fn test_negative_count_is_rejected() {
        let store = Arc::new(MemoryTelemetryStore::new());
        store.insert_device(device(1));

        let mut sample = sample(1);
        sample.count = -1;

        let result = service(store).ingest(sample).await;
        assert!(matches!(result, Err(IngestError::Validation(_))));
    }
}
