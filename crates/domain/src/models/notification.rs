//! Notification domain model.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::device::DeviceSummary;

/// Closed set of operator-facing alert types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Tamper,
    Empty,
    Low,
    BatteryCritical,
    BatteryLow,
    PowerOff,
    /// Combined alert: battery low/critical while power is off.
    BatteryPowerOff,
}

impl NotificationType {
    /// Fixed priority used for operator-facing ordering. Distinct from the
    /// classifier's status ranks, but order-preserving within each group.
    pub fn priority(&self) -> i32 {
        match self {
            NotificationType::BatteryPowerOff => 110,
            NotificationType::Tamper => 100,
            NotificationType::Empty => 90,
            NotificationType::Low => 80,
            NotificationType::BatteryCritical => 75,
            NotificationType::BatteryLow => 74,
            NotificationType::PowerOff => 70,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            NotificationType::BatteryPowerOff => "Battery & Power Alert",
            NotificationType::Tamper => "Tamper Alert",
            NotificationType::Empty => "Empty Alert",
            NotificationType::Low => "Low Level Alert",
            NotificationType::BatteryCritical => "Critical Battery Alert",
            NotificationType::BatteryLow => "Low Battery Alert",
            NotificationType::PowerOff => "Power Off Alert",
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NotificationType::Tamper => "tamper",
            NotificationType::Empty => "empty",
            NotificationType::Low => "low",
            NotificationType::BatteryCritical => "battery_critical",
            NotificationType::BatteryLow => "battery_low",
            NotificationType::PowerOff => "power_off",
            NotificationType::BatteryPowerOff => "battery_power_off",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tamper" => Ok(NotificationType::Tamper),
            "empty" => Ok(NotificationType::Empty),
            "low" => Ok(NotificationType::Low),
            "battery_critical" => Ok(NotificationType::BatteryCritical),
            "battery_low" => Ok(NotificationType::BatteryLow),
            "power_off" => Ok(NotificationType::PowerOff),
            "battery_power_off" => Ok(NotificationType::BatteryPowerOff),
            other => Err(format!("unknown notification type: {}", other)),
        }
    }
}

/// Snapshot of the alert-relevant reading fields at trigger time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSnapshot {
    pub fill_alert: Option<String>,
    pub tamper: bool,
    pub battery_percentage: Option<f64>,
    pub power_status: Option<String>,
}

/// A notification the materializer wants persisted. `(reading_id, kind)` is
/// the dedup key; replaying a reading must not create a second row.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationDraft {
    pub device_id: i64,
    pub reading_id: i64,
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub priority: i32,
    pub snapshot: AlertSnapshot,
}

/// A persisted operator-facing notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub device_id: i64,
    pub reading_id: i64,
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub priority: i32,
    pub snapshot: AlertSnapshot,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload published to connected operator sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    pub id: i64,
    pub device: DeviceSummary,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub priority: i32,
    pub alert: Option<String>,
    pub tamper: bool,
    pub battery_percentage: Option<f64>,
    pub power_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

impl NotificationEvent {
    pub fn from_notification(notification: &Notification, device: &super::Device) -> Self {
        Self {
            id: notification.id,
            device: DeviceSummary::from(device),
            kind: notification.kind,
            title: notification.title.clone(),
            message: notification.message.clone(),
            priority: notification.priority,
            alert: notification.snapshot.fill_alert.clone(),
            tamper: notification.snapshot.tamper,
            battery_percentage: notification.snapshot.battery_percentage,
            power_status: notification.snapshot.power_status.clone(),
            created_at: notification.created_at,
            is_read: notification.is_read,
        }
    }
}
