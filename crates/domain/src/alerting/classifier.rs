//! The classifier: normalized reading -> triggered alert conditions.

use crate::models::Status;

use super::thresholds::{BatteryBand, FillLevel, PowerState, TamperState, ThresholdTable};
use super::NormalizedReading;

/// One alert condition that evaluated true for a reading.
///
/// Conditions are independent: a single reading can trigger several at
/// once (e.g. tamper plus empty plus battery critical).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Tamper,
    Empty,
    Low,
    Full,
    BatteryCritical,
    BatteryLow,
    NoPower,
    BatteryOff,
    PowerOff,
}

impl Condition {
    pub fn status(&self) -> Status {
        match self {
            Condition::Tamper => Status::Tamper,
            Condition::Empty => Status::Empty,
            Condition::Low => Status::Low,
            Condition::Full => Status::Full,
            Condition::BatteryCritical => Status::BatteryCritical,
            Condition::BatteryLow => Status::BatteryLow,
            Condition::NoPower => Status::NoPower,
            Condition::BatteryOff => Status::BatteryOff,
            Condition::PowerOff => Status::PowerOff,
        }
    }

    pub fn rank(&self) -> u8 {
        self.status().rank()
    }
}

/// Pure classification of readings against the threshold table. No I/O,
/// deterministic; staleness is the caller's concern.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    thresholds: ThresholdTable,
}

impl Classifier {
    pub fn new(thresholds: ThresholdTable) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    /// Evaluates every condition predicate independently and returns all
    /// that are true, highest rank first.
    pub fn classify(&self, reading: &NormalizedReading) -> Vec<Condition> {
        let mut conditions = Vec::new();

        if reading.tamper == TamperState::Tampered {
            conditions.push(Condition::Tamper);
        }

        match reading.fill {
            FillLevel::Empty => conditions.push(Condition::Empty),
            FillLevel::Low => conditions.push(Condition::Low),
            FillLevel::Full => conditions.push(Condition::Full),
            FillLevel::Normal => {}
        }

        if let Some(percentage) = reading.battery {
            match self.thresholds.battery_band(percentage) {
                BatteryBand::Critical => conditions.push(Condition::BatteryCritical),
                BatteryBand::Low => conditions.push(Condition::BatteryLow),
                BatteryBand::Off => conditions.push(Condition::BatteryOff),
                BatteryBand::Normal => {}
            }
        }

        match reading.power {
            PowerState::NoPower => {
                conditions.push(Condition::NoPower);
                conditions.push(Condition::PowerOff);
            }
            PowerState::Off => conditions.push(Condition::PowerOff),
            PowerState::On | PowerState::Unknown => {}
        }

        conditions.sort_by(|a, b| b.rank().cmp(&a.rank()));
        conditions
    }

    /// Tie-break for dashboard summaries: the single highest-rank true
    /// condition, or `Normal` when none fire. Never returns `Offline`;
    /// staleness is decided by the aggregator.
    pub fn current_status(&self, reading: &NormalizedReading) -> Status {
        self.classify(reading)
            .first()
            .map(|c| c.status())
            .unwrap_or(Status::Normal)
    }
}
