//! Threshold table and input normalization.
//!
//! Devices in the field report the same fact in many spellings; every
//! free-form field is reduced to a closed enum here, before any business
//! logic runs. The string-matching tables below are the single place that
//! knowledge lives.

use serde::{Deserialize, Serialize};

/// Tamper flag after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TamperState {
    Tampered,
    Intact,
}

/// Power supply state after normalization.
///
/// `Off` and `NoPower` are both treated as power-off-equivalent for
/// alerting; `NoPower` (the literal token "no") is kept distinct because it
/// means the mains supply is absent rather than the device being switched
/// off, and it ranks differently on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerState {
    On,
    Off,
    NoPower,
    Unknown,
}

impl PowerState {
    pub fn is_off_equivalent(&self) -> bool {
        matches!(self, PowerState::Off | PowerState::NoPower)
    }
}

/// Fill alert code after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillLevel {
    Empty,
    Low,
    Full,
    Normal,
}

/// Battery band for a known percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryBand {
    Normal,
    Low,
    Critical,
    /// Exactly 0%: some devices report this to mean the battery module is
    /// absent or switched off, not that it is about to die.
    Off,
}

/// Battery thresholds, constructed explicitly so tests can vary them.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdTable {
    /// Upper bound of the low band, inclusive.
    pub battery_low: f64,
    /// Upper bound of the critical band, inclusive.
    pub battery_critical: f64,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self {
            battery_low: 20.0,
            battery_critical: 10.0,
        }
    }
}

impl ThresholdTable {
    /// Band for a battery percentage: `>low` normal, `(critical, low]` low,
    /// `(0, critical]` critical, exactly 0 off.
    pub fn battery_band(&self, percentage: f64) -> BatteryBand {
        if percentage == 0.0 {
            BatteryBand::Off
        } else if percentage <= self.battery_critical {
            BatteryBand::Critical
        } else if percentage <= self.battery_low {
            BatteryBand::Low
        } else {
            BatteryBand::Normal
        }
    }
}

pub fn normalize_tamper(raw: Option<&str>) -> TamperState {
    match raw {
        Some(value) => {
            let v = value.trim().to_ascii_lowercase();
            if matches!(v.as_str(), "true" | "yes" | "1") {
                TamperState::Tampered
            } else {
                TamperState::Intact
            }
        }
        None => TamperState::Intact,
    }
}

pub fn normalize_power(raw: Option<&str>) -> PowerState {
    match raw {
        None => PowerState::Off,
        Some(value) => {
            let v = value.trim().to_ascii_lowercase();
            match v.as_str() {
                "no" => PowerState::NoPower,
                "off" | "none" | "" | "0" | "false" => PowerState::Off,
                "on" | "yes" | "1" | "true" => PowerState::On,
                _ => PowerState::Unknown,
            }
        }
    }
}

pub fn normalize_fill(raw: Option<&str>) -> FillLevel {
    match raw {
        Some(value) => match value.trim().to_ascii_uppercase().as_str() {
            "EMPTY" => FillLevel::Empty,
            "LOW" => FillLevel::Low,
            "FULL" => FillLevel::Full,
            _ => FillLevel::Normal,
        },
        None => FillLevel::Normal,
    }
}

/// Parses a battery percentage from its textual form. Null sentinels and
/// unparsable or out-of-range values yield `None`, so no battery condition
/// fires for them.
pub fn normalize_battery(raw: Option<&str>) -> Option<f64> {
    let value = raw?.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("none") || value.eq_ignore_ascii_case("null")
    {
        return None;
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|v| (0.0..=100.0).contains(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tamper_truthy_spellings() {
        for raw in ["true", "TRUE", "Yes", "1", " yes "] {
            assert_eq!(normalize_tamper(Some(raw)), TamperState::Tampered, "{raw}");
        }
    }

    #[test]
    fn test_normalize_tamper_falsy_spellings() {
        for raw in ["false", "no", "0", "", "garbage"] {
            assert_eq!(normalize_tamper(Some(raw)), TamperState::Intact, "{raw}");
        }
        assert_eq!(normalize_tamper(None), TamperState::Intact);
    }

    #[test]
    fn test_normalize_power_off_equivalents() {
        for raw in ["off", "OFF", "none", "", "0", "false"] {
            let state = normalize_power(Some(raw));
            assert_eq!(state, PowerState::Off, "{raw}");
            assert!(state.is_off_equivalent());
        }
        assert_eq!(normalize_power(None), PowerState::Off);
    }

    #[test]
    fn test_normalize_power_no_is_distinguished() {
        let state = normalize_power(Some("No"));
        assert_eq!(state, PowerState::NoPower);
        assert!(state.is_off_equivalent());
    }

    #[test]
    fn test_normalize_power_on_and_unknown() {
        assert_eq!(normalize_power(Some("ON")), PowerState::On);
        assert_eq!(normalize_power(Some("true")), PowerState::On);
        assert_eq!(normalize_power(Some("flickering")), PowerState::Unknown);
        assert!(!PowerState::Unknown.is_off_equivalent());
    }

    #[test]
    fn test_normalize_fill() {
        assert_eq!(normalize_fill(Some("EMPTY")), FillLevel::Empty);
        assert_eq!(normalize_fill(Some("low")), FillLevel::Low);
        assert_eq!(normalize_fill(Some("Full")), FillLevel::Full);
        assert_eq!(normalize_fill(Some("OK")), FillLevel::Normal);
        assert_eq!(normalize_fill(None), FillLevel::Normal);
    }

    #[test]
    fn test_normalize_battery_sentinels_and_garbage() {
        for raw in ["", "None", "none", "null", "not-a-number", "150", "-3"] {
            assert_eq!(normalize_battery(Some(raw)), None, "{raw}");
        }
        assert_eq!(normalize_battery(None), None);
        assert_eq!(normalize_battery(Some("42.5")), Some(42.5));
        assert_eq!(normalize_battery(Some("0")), Some(0.0));
    }

    #[test]
    fn test_battery_bands_at_boundaries() {
        let table = ThresholdTable::default();
        assert_eq!(table.battery_band(100.0), BatteryBand::Normal);
        assert_eq!(table.battery_band(20.1), BatteryBand::Normal);
        assert_eq!(table.battery_band(20.0), BatteryBand::Low);
        assert_eq!(table.battery_band(10.1), BatteryBand::Low);
        assert_eq!(table.battery_band(10.0), BatteryBand::Critical);
        assert_eq!(table.battery_band(0.1), BatteryBand::Critical);
        assert_eq!(table.battery_band(0.0), BatteryBand::Off);
    }

    #[test]
    fn test_battery_bands_with_custom_thresholds() {
        let table = ThresholdTable {
            battery_low: 50.0,
            battery_critical: 25.0,
        };
        assert_eq!(table.battery_band(40.0), BatteryBand::Low);
        assert_eq!(table.battery_band(25.0), BatteryBand::Critical);
        assert_eq!(table.battery_band(60.0), BatteryBand::Normal);
    }
}
