//! Storage seam for the ingestion and fan-out pipeline.

use std::sync::Mutex;

use chrono::Utc;

use crate::models::{
    Device, NewReading, Notification, NotificationDraft, PushToken, Reading,
};

/// Storage failure. Fatal on the ingestion path: the persisted record is
/// the durable source of truth for what happened.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

/// The persistence operations the engine needs.
///
/// `create_notification_if_absent` is the idempotence point: the store
/// treats `(reading_id, kind)` as a unique key, and replaying a reading
/// returns `None` instead of a second row.
#[async_trait::async_trait]
pub trait TelemetryStore: Send + Sync {
    async fn find_device(&self, device_id: i64) -> Result<Option<Device>, StoreError>;

    async fn create_reading(&self, new: NewReading) -> Result<Reading, StoreError>;

    /// Every device paired with its most recent reading (by server
    /// timestamp), `None` for devices that have never reported.
    async fn latest_readings(&self) -> Result<Vec<(Device, Option<Reading>)>, StoreError>;

    /// Persists a draft unless a notification with the same
    /// `(reading_id, kind)` already exists.
    async fn create_notification_if_absent(
        &self,
        draft: &NotificationDraft,
    ) -> Result<Option<Notification>, StoreError>;

    /// Tokens subscribed to this device, deduplicated: tokens bound to the
    /// device plus fleet-wide subscribers.
    async fn list_push_tokens(&self, device_id: i64) -> Result<Vec<PushToken>, StoreError>;
}

#[derive(Debug, Default)]
struct MemoryInner {
    devices: Vec<Device>,
    readings: Vec<Reading>,
    notifications: Vec<Notification>,
    tokens: Vec<PushToken>,
    next_reading_id: i64,
    next_notification_id: i64,
}

/// In-memory store for development and pipeline tests.
#[derive(Debug, Default)]
pub struct MemoryTelemetryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryTelemetryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_device(&self, device: Device) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.devices.push(device);
        }
    }

    pub fn insert_token(&self, token: PushToken) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.tokens.push(token);
        }
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.inner
            .lock()
            .map(|inner| inner.notifications.clone())
            .unwrap_or_default()
    }

    /// Shifts every stored reading into the past, for staleness scenarios.
    pub fn backdate_readings(&self, by: chrono::Duration) {
        if let Ok(mut inner) = self.inner.lock() {
            for reading in &mut inner.readings {
                reading.timestamp -= by;
            }
        }
    }

    pub fn readings(&self) -> Vec<Reading> {
        self.inner
            .lock()
            .map(|inner| inner.readings.clone())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryInner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Database("memory store lock poisoned".to_string()))
    }
}

#[async_trait::async_trait]
impl TelemetryStore for MemoryTelemetryStore {
    async fn find_device(&self, device_id: i64) -> Result<Option<Device>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.devices.iter().find(|d| d.id == device_id).cloned())
    }

    async fn create_reading(&self, new: NewReading) -> Result<Reading, StoreError> {
        let mut inner = self.lock()?;
        inner.next_reading_id += 1;
        let reading = Reading {
            id: inner.next_reading_id,
            device_id: new.device_id,
            timestamp: Utc::now(),
            fill_alert: new.fill_alert,
            count: new.count,
            refer_val: new.refer_val,
            tamper: new.tamper,
            total_usage: new.total_usage,
            battery_percentage: new.battery_percentage,
            power_status: new.power_status,
            device_timestamp: new.device_timestamp,
        };
        inner.readings.push(reading.clone());
        Ok(reading)
    }

    async fn latest_readings(&self) -> Result<Vec<(Device, Option<Reading>)>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .devices
            .iter()
            .map(|device| {
                let latest = inner
                    .readings
                    .iter()
                    .filter(|r| r.device_id == device.id)
                    .max_by_key(|r| (r.timestamp, r.id))
                    .cloned();
                (device.clone(), latest)
            })
            .collect())
    }

    async fn create_notification_if_absent(
        &self,
        draft: &NotificationDraft,
    ) -> Result<Option<Notification>, StoreError> {
        let mut inner = self.lock()?;
        let exists = inner
            .notifications
            .iter()
            .any(|n| n.reading_id == draft.reading_id && n.kind == draft.kind);
        if exists {
            return Ok(None);
        }

        inner.next_notification_id += 1;
        let notification = Notification {
            id: inner.next_notification_id,
            device_id: draft.device_id,
            reading_id: draft.reading_id,
            kind: draft.kind,
            title: draft.title.clone(),
            message: draft.message.clone(),
            priority: draft.priority,
            snapshot: draft.snapshot.clone(),
            is_read: false,
            created_at: Utc::now(),
        };
        inner.notifications.push(notification.clone());
        Ok(Some(notification))
    }

    async fn list_push_tokens(&self, device_id: i64) -> Result<Vec<PushToken>, StoreError> {
        let inner = self.lock()?;
        let mut seen = std::collections::HashSet::new();
        Ok(inner
            .tokens
            .iter()
            .filter(|t| t.device_id.is_none() || t.device_id == Some(device_id))
            .filter(|t| seen.insert(t.token.clone()))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{AlertSnapshot, NotificationType};

    use super::*;

    fn device(id: i64) -> Device {
        Device {
            id,
            device_code: None,
            name: format!("Device {id}"),
            floor_number: 1,
            room_number: "101".to_string(),
            consumable_type: "hand_towel".to_string(),
            meter_capacity: 500,
            refer_value: 500,
            created_at: Utc::now(),
        }
    }

    fn draft(reading_id: i64, kind: NotificationType) -> NotificationDraft {
        NotificationDraft {
            device_id: 1,
            reading_id,
            kind,
            title: kind.title().to_string(),
            message: "msg".to_string(),
            priority: kind.priority(),
            snapshot: AlertSnapshot::default(),
        }
    }

    #[tokio::test]
    async fn test_notification_dedup_on_reading_and_kind() {
        let store = MemoryTelemetryStore::new();
        store.insert_device(device(1));

        let first = store
            .create_notification_if_absent(&draft(42, NotificationType::Empty))
            .await
            .unwrap();
        assert!(first.is_some());

        // Replay of the same reading: no duplicate.
        let second = store
            .create_notification_if_absent(&draft(42, NotificationType::Empty))
            .await
            .unwrap();
        assert!(second.is_none());

        // Different kind for the same reading is a separate notification.
        let third = store
            .create_notification_if_absent(&draft(42, NotificationType::Tamper))
            .await
            .unwrap();
        assert!(third.is_some());

        assert_eq!(store.notifications().len(), 2);
    }

    #[tokio::test]
    async fn test_latest_readings_orders_by_server_timestamp() {
        let store = MemoryTelemetryStore::new();
        store.insert_device(device(1));
        store.insert_device(device(2));

        let new = |device_id| NewReading {
            device_id,
            fill_alert: None,
            count: 0,
            refer_val: 500,
            tamper: None,
            total_usage: None,
            battery_percentage: None,
            power_status: None,
            device_timestamp: None,
        };

        store.create_reading(new(1)).await.unwrap();
        let second = store.create_reading(new(1)).await.unwrap();

        let latest = store.latest_readings().await.unwrap();
        assert_eq!(latest.len(), 2);
        let (_, reading) = latest.iter().find(|(d, _)| d.id == 1).unwrap();
        assert_eq!(reading.as_ref().map(|r| r.id), Some(second.id));
        let (_, reading) = latest.iter().find(|(d, _)| d.id == 2).unwrap();
        assert!(reading.is_none());
    }

    #[tokio::test]
    async fn test_push_tokens_deduplicated_and_scoped() {
        let store = MemoryTelemetryStore::new();
        let token = |id: i64, device_id: Option<i64>, token: &str| PushToken {
            id,
            user_id: uuid::Uuid::nil(),
            device_id,
            token: token.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        store.insert_token(token(1, Some(1), "tok-a"));
        store.insert_token(token(2, None, "tok-b"));
        store.insert_token(token(3, Some(2), "tok-c"));
        store.insert_token(token(4, Some(1), "tok-a"));

        let tokens = store.list_push_tokens(1).await.unwrap();
        let mut names: Vec<_> = tokens.iter().map(|t| t.token.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["tok-a", "tok-b"]);
    }
}
