//! Notification entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{AlertSnapshot, Notification, NotificationType};
use sqlx::FromRow;

/// Database row mapping for the notifications table.
#[derive(Debug, Clone, FromRow)]
pub struct NotificationEntity {
    pub id: i64,
    pub device_id: i64,
    pub reading_id: i64,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub priority: i32,
    pub fill_alert: Option<String>,
    pub tamper: bool,
    pub battery_percentage: Option<f64>,
    pub power_status: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<NotificationEntity> for Notification {
    type Error = String;

    fn try_from(entity: NotificationEntity) -> Result<Self, Self::Error> {
        let kind: NotificationType = entity.notification_type.parse()?;
        Ok(Self {
            id: entity.id,
            device_id: entity.device_id,
            reading_id: entity.reading_id,
            kind,
            title: entity.title,
            message: entity.message,
            priority: entity.priority,
            snapshot: AlertSnapshot {
                fill_alert: entity.fill_alert,
                tamper: entity.tamper,
                battery_percentage: entity.battery_percentage,
                power_status: entity.power_status,
            },
            is_read: entity.is_read,
            created_at: entity.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(kind: &str) -> NotificationEntity {
        NotificationEntity {
            id: 1,
            device_id: 7,
            reading_id: 42,
            notification_type: kind.to_string(),
            title: "Battery & Power Alert".to_string(),
            message: "Battery is CRITICAL (5%) and device power is OFF!".to_string(),
            priority: 110,
            fill_alert: None,
            tamper: false,
            battery_percentage: Some(5.0),
            power_status: Some("OFF".to_string()),
            is_read: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_notification_entity_to_domain() {
        let notification = Notification::try_from(entity("battery_power_off")).unwrap();
        assert_eq!(notification.kind, NotificationType::BatteryPowerOff);
        assert_eq!(notification.snapshot.battery_percentage, Some(5.0));
        assert_eq!(notification.snapshot.power_status.as_deref(), Some("OFF"));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(Notification::try_from(entity("maintenance")).is_err());
    }
}
