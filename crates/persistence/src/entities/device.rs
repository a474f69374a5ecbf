//! Device entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the devices table.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceEntity {
    pub id: i64,
    pub device_code: Option<String>,
    pub name: String,
    pub floor_number: i32,
    pub room_number: String,
    pub consumable_type: String,
    pub meter_capacity: i32,
    pub refer_value: i32,
    pub created_at: DateTime<Utc>,
}

impl From<DeviceEntity> for domain::models::Device {
    fn from(entity: DeviceEntity) -> Self {
        Self {
            id: entity.id,
            device_code: entity.device_code,
            name: entity.name,
            floor_number: entity.floor_number,
            room_number: entity.room_number,
            consumable_type: entity.consumable_type,
            meter_capacity: entity.meter_capacity,
            refer_value: entity.refer_value,
            created_at: entity.created_at,
        }
    }
}
