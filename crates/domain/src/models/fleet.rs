//! Fleet status view models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current status of a device for dashboard display.
///
/// One authoritative ranking covers every status; the aggregator sorts the
/// fleet by it. `Offline` is terminal and distinct from `Normal`: it means
/// the device has no recent reading at all, so no alert condition can be
/// trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Tamper,
    Empty,
    Low,
    Full,
    BatteryCritical,
    BatteryLow,
    NoPower,
    BatteryOff,
    PowerOff,
    Normal,
    Offline,
}

impl Status {
    /// Sort weight, highest first. Offline sorts after every active status.
    pub fn rank(&self) -> u8 {
        match self {
            Status::Tamper => 10,
            Status::Empty => 9,
            Status::Low => 8,
            Status::Full => 7,
            Status::BatteryCritical => 6,
            Status::BatteryLow => 5,
            Status::NoPower => 4,
            Status::BatteryOff => 3,
            Status::PowerOff => 2,
            Status::Normal => 1,
            Status::Offline => 0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Tamper => "tamper",
            Status::Empty => "empty",
            Status::Low => "low",
            Status::Full => "full",
            Status::BatteryCritical => "battery_critical",
            Status::BatteryLow => "battery_low",
            Status::NoPower => "no_power",
            Status::BatteryOff => "battery_off",
            Status::PowerOff => "power_off",
            Status::Normal => "normal",
            Status::Offline => "offline",
        }
    }
}

/// One row of the fleet status view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStatus {
    pub device_id: i64,
    pub device_name: String,
    pub room_number: String,
    pub floor_number: i32,
    pub is_active: bool,
    pub status: Status,
    pub last_updated: Option<DateTime<Utc>>,
    pub minutes_since_update: Option<i64>,
    pub current_alert: Option<String>,
    pub current_tamper: bool,
    pub current_count: i32,
    pub refer_val: Option<i32>,
    pub total_usage: Option<i32>,
    pub battery_percentage: Option<f64>,
    pub power_status: Option<String>,
}

/// Roll-up counts across the fleet for the dashboard header.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSummary {
    pub total_devices: usize,
    pub active: usize,
    pub offline: usize,
    pub tamper: usize,
    pub empty: usize,
    pub low: usize,
    pub battery_alerts: usize,
    pub power_alerts: usize,
}
