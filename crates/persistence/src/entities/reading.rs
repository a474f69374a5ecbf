//! Reading entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the readings table.
#[derive(Debug, Clone, FromRow)]
pub struct ReadingEntity {
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

impl From<ReadingEntity> for domain::models::Reading {
    fn from(entity: ReadingEntity) -> Self {
        Self {
            id: entity.id,
            device_id: entity.device_id,
            timestamp: entity.timestamp,
            fill_alert: entity.fill_alert,
            count: entity.count,
            refer_val: entity.refer_val,
            tamper: entity.tamper,
            total_usage: entity.total_usage,
            battery_percentage: entity.battery_percentage,
            power_status: entity.power_status,
            device_timestamp: entity.device_timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_entity_to_domain() {
        let entity = ReadingEntity {
            id: 42,
            device_id: 7,
            timestamp: Utc::now(),
            fill_alert: Some("LOW".to_string()),
            count: 120,
            refer_val: 500,
            tamper: Some("false".to_string()),
            total_usage: Some(380),
            battery_percentage: Some(42.5),
            power_status: Some("ON".to_string()),
            device_timestamp: Some("2026-08-29 10:00:00".to_string()),
        };

        let reading: domain::models::Reading = entity.clone().into();
        assert_eq!(reading.id, entity.id);
        assert_eq!(reading.fill_alert.as_deref(), Some("LOW"));
        assert_eq!(reading.battery_percentage, Some(42.5));
    }
}
