//! Device domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A field-deployed dispenser device.
///
/// Owned by the provisioning subsystem; the engine treats every field as
/// immutable except `meter_capacity`/`refer_value`, which interpret the
/// fill counter reported in readings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: i64,
    /// Optional hardware identifier printed on the unit.
    pub device_code: Option<String>,
    pub name: String,
    pub floor_number: i32,
    pub room_number: String,
    /// Consumable loaded in the dispenser (free text, e.g. "hand_towel").
    pub consumable_type: String,
    /// Capacity of the fill meter; `refer_value` follows it.
    pub meter_capacity: i32,
    pub refer_value: i32,
    pub created_at: DateTime<Utc>,
}

/// Compact device description embedded in notification payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSummary {
    pub id: i64,
    pub name: String,
    pub room_number: String,
    pub floor_number: i32,
}

impl From<&Device> for DeviceSummary {
    fn from(device: &Device) -> Self {
        Self {
            id: device.id,
            name: device.name.clone(),
            room_number: device.room_number.clone(),
            floor_number: device.floor_number,
        }
    }
}

impl Device {
    /// Human-readable location label used in push notification bodies.
    pub fn location_label(&self) -> String {
        format!(
            "{} (Room {}, Floor {})",
            self.name, self.room_number, self.floor_number
        )
    }
}
