//! Reading domain model and the raw ingestion contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// One ingested telemetry sample, as persisted.
///
/// `timestamp` is server-assigned and authoritative for ordering and
/// staleness; `device_timestamp` is the device's own clock, kept verbatim
/// for diagnostics only (it may be absent or out of order).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub id: i64,
    pub device_id: i64,
    pub timestamp: DateTime<Utc>,
    pub fill_alert: Option<String>,
    pub count: i32,
    pub refer_val: i32,
    pub tamper: Option<String>,
    pub total_usage: Option<i32>,
    pub battery_percentage: Option<f64>,
    pub power_status: Option<String>,
    pub device_timestamp: Option<String>,
}

/// Fields for persisting a new reading. The store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewReading {
    pub device_id: i64,
    pub fill_alert: Option<String>,
    pub count: i32,
    pub refer_val: i32,
    pub tamper: Option<String>,
    pub total_usage: Option<i32>,
    pub battery_percentage: Option<f64>,
    pub power_status: Option<String>,
    pub device_timestamp: Option<String>,
}

/// The flat sample record devices post, before any normalization.
///
/// Field names match the device firmware contract. Optional fields may be
/// missing or malformed; tamper and battery arrive in whatever scalar shape
/// the firmware picked (string, bool, or number), so both are accepted as
/// any JSON scalar and carried as text until normalization.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RawSample {
    #[serde(rename = "DID")]
    pub device_id: i64,

    #[serde(rename = "TS", default)]
    pub device_timestamp: Option<String>,

    #[serde(rename = "ALERT", default)]
    pub fill_alert: Option<String>,

    #[serde(rename = "count")]
    #[validate(range(min = 0, message = "count must not be negative"))]
    pub count: i32,

    #[serde(rename = "REFER_Val")]
    #[validate(range(min = 0, message = "refer_val must not be negative"))]
    pub refer_val: i32,

    #[serde(rename = "TOTAL_USAGE", default)]
    pub total_usage: Option<i32>,

    #[serde(rename = "TAMPER", default, deserialize_with = "scalar_to_string")]
    pub tamper: Option<String>,

    #[serde(
        rename = "BATTERY_PERCENTAGE",
        default,
        deserialize_with = "scalar_to_string"
    )]
    pub battery_percentage: Option<String>,

    #[serde(rename = "PWR_STATUS", default, deserialize_with = "scalar_to_string")]
    pub power_status: Option<String>,
}

/// Accepts a JSON string, bool, or number and renders it as text.
///
/// Device firmware has historically sent tamper as `"true"`, `true`, and
/// `1` depending on revision; normalization works on the textual form.
fn scalar_to_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }))
}
