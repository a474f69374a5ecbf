//! Fleet status aggregation.
//!
//! Builds the dashboard view: every device with its authoritative
//! status derived from the latest reading, plus roll-up counts.
//! Read-only and stateless; safe to run concurrently with ingestion.

use std::sync::Arc;

use chrono::{Duration, Utc};
use domain::alerting::{Classifier, NormalizedReading};
use domain::models::{Device, DeviceStatus, FleetSummary, Reading, Status};
use domain::services::{StoreError, TelemetryStore};

use crate::config::FleetConfig;

pub struct FleetStatusAggregator<S> {
    store: Arc<S>,
    classifier: Classifier,
    activity_threshold: Duration,
}

impl<S: TelemetryStore> FleetStatusAggregator<S> {
    pub fn new(store: Arc<S>, classifier: Classifier, config: &FleetConfig) -> Self {
        Self {
            store,
            classifier,
            activity_threshold: Duration::seconds(config.activity_threshold_secs),
        }
    }

    /// One status row per device, sorted most urgent first. Within the
    /// same status, most recently updated first; devices that have never
    /// reported sort last.
    pub async fn aggregate(&self) -> Result<Vec<DeviceStatus>, StoreError> {
        let now = Utc::now();
        let mut rows: Vec<DeviceStatus> = self
            .store
            .latest_readings()
            .await?
            .into_iter()
            .map(|(device, reading)| self.status_row(&device, reading.as_ref(), now))
            .collect();

        rows.sort_by(|a, b| {
            b.status
                .rank()
                .cmp(&a.status.rank())
                .then_with(|| b.last_updated.cmp(&a.last_updated))
        });

        Ok(rows)
    }

    /// Roll-up counts for the dashboard header.
    pub async fn summary(&self) -> Result<FleetSummary, StoreError> {
        let rows = self.aggregate().await?;
        let mut summary = FleetSummary {
            total_devices: rows.len(),
            ..FleetSummary::default()
        };

        for row in &rows {
            if row.is_active {
                summary.active += 1;
            } else {
                summary.offline += 1;
            }
            match row.status {
                Status::Tamper => summary.tamper += 1,
                Status::Empty => summary.empty += 1,
                Status::Low => summary.low += 1,
                Status::BatteryCritical | Status::BatteryLow | Status::BatteryOff => {
                    summary.battery_alerts += 1
                }
                Status::NoPower | Status::PowerOff => summary.power_alerts += 1,
                _ => {}
            }
        }

        Ok(summary)
    }

    fn status_row(
        &self,
        device: &Device,
        reading: Option<&Reading>,
        now: chrono::DateTime<Utc>,
    ) -> DeviceStatus {
        let Some(reading) = reading else {
            return DeviceStatus {
                device_id: device.id,
                device_name: device.name.clone(),
                room_number: device.room_number.clone(),
                floor_number: device.floor_number,
                is_active: false,
                status: Status::Offline,
                last_updated: None,
                minutes_since_update: None,
                current_alert: None,
                current_tamper: false,
                current_count: 0,
                refer_val: None,
                total_usage: None,
                battery_percentage: None,
                power_status: None,
            };
        };

        let age = now - reading.timestamp;
        let is_active = age <= self.activity_threshold;

        // A stale reading still shows its last values, but its alert
        // conditions cannot be trusted, so the status is offline.
        let status = if is_active {
            let normalized = NormalizedReading::from_reading(reading);
            self.classifier.current_status(&normalized)
        } else {
            Status::Offline
        };

        DeviceStatus {
            device_id: device.id,
            device_name: device.name.clone(),
            room_number: device.room_number.clone(),
            floor_number: device.floor_number,
            is_active,
            status,
            last_updated: Some(reading.timestamp),
            minutes_since_update: Some(age.num_minutes()),
            current_alert: reading.fill_alert.clone(),
            current_tamper: matches!(
                domain::alerting::thresholds::normalize_tamper(reading.tamper.as_deref()),
                domain::alerting::TamperState::Tampered
            ),
            current_count: reading.count,
            refer_val: Some(reading.refer_val),
            total_usage: reading.total_usage,
            battery_percentage: reading.battery_percentage,
            power_status: reading.power_status.clone(),
        }
    }
}
