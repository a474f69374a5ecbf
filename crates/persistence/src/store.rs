//! Postgres-backed implementation of the domain storage seam.

use domain::models::{Device, NewReading, Notification, NotificationDraft, PushToken, Reading};
use domain::services::{StoreError, TelemetryStore};
use sqlx::PgPool;

use crate::repositories::{
    DeviceRepository, NotificationRepository, PushTokenRepository, ReadingRepository,
};

/// [`TelemetryStore`] over the Postgres repositories. Concurrent writes
/// serialize at the database; no coordination happens here.
#[derive(Clone)]
pub struct PgTelemetryStore {
    devices: DeviceRepository,
    readings: ReadingRepository,
    notifications: NotificationRepository,
    push_tokens: PushTokenRepository,
}

impl PgTelemetryStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            devices: DeviceRepository::new(pool.clone()),
            readings: ReadingRepository::new(pool.clone()),
            notifications: NotificationRepository::new(pool.clone()),
            push_tokens: PushTokenRepository::new(pool),
        }
    }

    pub fn devices(&self) -> &DeviceRepository {
        &self.devices
    }

    pub fn notifications(&self) -> &NotificationRepository {
        &self.notifications
    }

    pub fn push_tokens(&self) -> &PushTokenRepository {
        &self.push_tokens
    }
}

#[async_trait::async_trait]
impl TelemetryStore for PgTelemetryStore {
    async fn find_device(&self, device_id: i64) -> Result<Option<Device>, StoreError> {
        Ok(self.devices.find_by_id(device_id).await?)
    }

    async fn create_reading(&self, new: NewReading) -> Result<Reading, StoreError> {
        Ok(self.readings.create(new).await?)
    }

    async fn latest_readings(&self) -> Result<Vec<(Device, Option<Reading>)>, StoreError> {
        Ok(self.readings.latest_per_device().await?)
    }

    async fn create_notification_if_absent(
        &self,
        draft: &NotificationDraft,
    ) -> Result<Option<Notification>, StoreError> {
        Ok(self.notifications.create_if_absent(draft).await?)
    }

    async fn list_push_tokens(&self, device_id: i64) -> Result<Vec<PushToken>, StoreError> {
        Ok(self.push_tokens.list_for_device(device_id).await?)
    }
}
