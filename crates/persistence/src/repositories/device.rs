//! Device repository for database operations.

use domain::models::Device;
use sqlx::PgPool;

use crate::entities::DeviceEntity;

/// Repository for device database operations.
#[derive(Clone)]
pub struct DeviceRepository {
    pool: PgPool,
}

impl DeviceRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a device by its numeric id.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Device>, sqlx::Error> {
        let entity = sqlx::query_as::<_, DeviceEntity>(
            r#"
            SELECT id, device_code, name, floor_number, room_number, consumable_type, meter_capacity, refer_value, created_at
            FROM devices
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Find a device by the hardware code printed on the unit.
    pub async fn find_by_code(&self, device_code: &str) -> Result<Option<Device>, sqlx::Error> {
        let entity = sqlx::query_as::<_, DeviceEntity>(
            r#"
            SELECT id, device_code, name, floor_number, room_number, consumable_type, meter_capacity, refer_value, created_at
            FROM devices
            WHERE device_code = $1
            "#,
        )
        .bind(device_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    /// List every device, newest first.
    pub async fn list_all(&self) -> Result<Vec<Device>, sqlx::Error> {
        let entities = sqlx::query_as::<_, DeviceEntity>(
            r#"
            SELECT id, device_code, name, floor_number, room_number, consumable_type, meter_capacity, refer_value, created_at
            FROM devices
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }
}
