//! Alert classification rules.
//!
//! The pipeline is: normalize the free-form reading fields into closed
//! enums ([`thresholds`]), evaluate every alert condition independently
//! ([`classifier`]), then turn the true conditions into the notifications
//! to persist ([`materializer`]).

pub mod classifier;
pub mod materializer;
pub mod thresholds;

pub use classifier::{Classifier, Condition};
pub use materializer::materialize;
pub use thresholds::{FillLevel, PowerState, TamperState, ThresholdTable};

use crate::models::Reading;
use thresholds::{normalize_fill, normalize_power, normalize_tamper};

/// A reading with every free-form field normalized, plus the raw snapshot
/// values carried along for notification records.
#[derive(Debug, Clone)]
pub struct NormalizedReading {
    pub reading_id: i64,
    pub device_id: i64,
    pub fill: FillLevel,
    pub tamper: TamperState,
    /// Parsed battery percentage, `None` when absent or malformed.
    pub battery: Option<f64>,
    pub power: PowerState,
    pub fill_alert_raw: Option<String>,
    pub power_status_raw: Option<String>,
}

impl NormalizedReading {
    pub fn from_reading(reading: &Reading) -> Self {
        Self {
            reading_id: reading.id,
            device_id: reading.device_id,
            fill: normalize_fill(reading.fill_alert.as_deref()),
            tamper: normalize_tamper(reading.tamper.as_deref()),
            battery: reading
                .battery_percentage
                .filter(|v| (0.0..=100.0).contains(v)),
            power: normalize_power(reading.power_status.as_deref()),
            fill_alert_raw: reading.fill_alert.clone(),
            power_status_raw: reading.power_status.clone(),
        }
    }
}
