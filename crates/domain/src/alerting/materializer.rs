//! The materializer: triggered conditions -> notifications to persist.

use crate::models::{AlertSnapshot, Device, NotificationDraft, NotificationType};

use super::classifier::Condition;
use super::thresholds::TamperState;
use super::NormalizedReading;

/// Turns the conditions triggered by one reading into the final set of
/// notification drafts.
///
/// The combined rule: a low/critical battery together with a
/// power-off-equivalent state produces exactly one `battery_power_off`
/// draft and suppresses the individual battery and power-off drafts.
/// `full`, `no_power`-only, and `battery_off`-only states never notify;
/// they surface on the dashboard instead.
pub fn materialize(
    conditions: &[Condition],
    reading: &NormalizedReading,
    device: &Device,
) -> Vec<NotificationDraft> {
    let battery_critical = conditions.contains(&Condition::BatteryCritical);
    let battery_low = conditions.contains(&Condition::BatteryLow);
    let power_off = conditions.contains(&Condition::PowerOff);

    let mut drafts = Vec::new();

    if (battery_critical || battery_low) && power_off {
        let severity = if battery_critical { "CRITICAL" } else { "LOW" };
        let percentage = reading.battery.unwrap_or_default();
        drafts.push(draft(
            reading,
            device,
            NotificationType::BatteryPowerOff,
            format!(
                "Battery is {} ({}%) and device power is OFF! Immediate action required.",
                severity, percentage
            ),
        ));
        return drafts;
    }

    for condition in conditions {
        match condition {
            Condition::Tamper => drafts.push(draft(
                reading,
                device,
                NotificationType::Tamper,
                "Device tampering detected".to_string(),
            )),
            Condition::Empty => drafts.push(draft(
                reading,
                device,
                NotificationType::Empty,
                "Container is empty - needs refill".to_string(),
            )),
            Condition::Low => drafts.push(draft(
                reading,
                device,
                NotificationType::Low,
                "Container level low - refill soon".to_string(),
            )),
            Condition::BatteryCritical => drafts.push(draft(
                reading,
                device,
                NotificationType::BatteryCritical,
                format!(
                    "Battery critically low ({}%)! Immediate replacement required.",
                    reading.battery.unwrap_or_default()
                ),
            )),
            Condition::BatteryLow => drafts.push(draft(
                reading,
                device,
                NotificationType::BatteryLow,
                format!(
                    "Battery low ({}%). Replace soon.",
                    reading.battery.unwrap_or_default()
                ),
            )),
            Condition::PowerOff => drafts.push(draft(
                reading,
                device,
                NotificationType::PowerOff,
                "Device power is OFF! Check power supply.".to_string(),
            )),
            // Dashboard-only states.
            Condition::Full | Condition::NoPower | Condition::BatteryOff => {}
        }
    }

    drafts
}

fn draft(
    reading: &NormalizedReading,
    device: &Device,
    kind: NotificationType,
    message: String,
) -> NotificationDraft {
    NotificationDraft {
        device_id: device.id,
        reading_id: reading.reading_id,
        kind,
        title: kind.title().to_string(),
        message,
        priority: kind.priority(),
        snapshot: AlertSnapshot {
            fill_alert: reading.fill_alert_raw.clone(),
            tamper: reading.tamper == TamperState::Tampered,
            battery_percentage: reading.battery,
            power_status: reading.power_status_raw.clone(),
        },
    }
}
