//! Reading repository for database operations.

use domain::models::{Device, NewReading, Reading};
use sqlx::PgPool;

use crate::entities::{DeviceEntity, ReadingEntity};
use crate::metrics::QueryTimer;

/// Repository for reading database operations. Readings are immutable
/// once written; "latest" always means latest server timestamp.
#[derive(Clone)]
pub struct ReadingRepository {
    pool: PgPool,
}

impl ReadingRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist one reading; the database assigns id and server timestamp.
    pub async fn create(&self, new: NewReading) -> Result<Reading, sqlx::Error> {
        let entity = sqlx::query_as::<_, ReadingEntity>(
            r#"
            INSERT INTO readings (device_id, fill_alert, count, refer_val, tamper, total_usage, battery_percentage, power_status, device_timestamp)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, device_id, timestamp, fill_alert, count, refer_val, tamper, total_usage, battery_percentage, power_status, device_timestamp
            "#,
        )
        .bind(new.device_id)
        .bind(&new.fill_alert)
        .bind(new.count)
        .bind(new.refer_val)
        .bind(&new.tamper)
        .bind(new.total_usage)
        .bind(new.battery_percentage)
        .bind(&new.power_status)
        .bind(&new.device_timestamp)
        .fetch_one(&self.pool)
        .await?;

        Ok(entity.into())
    }

    /// Most recent reading for one device.
    pub async fn latest_for_device(&self, device_id: i64) -> Result<Option<Reading>, sqlx::Error> {
        let entity = sqlx::query_as::<_, ReadingEntity>(
            r#"
            SELECT id, device_id, timestamp, fill_alert, count, refer_val, tamper, total_usage, battery_percentage, power_status, device_timestamp
            FROM readings
            WHERE device_id = $1
            ORDER BY timestamp DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Every device paired with its most recent reading, `None` for
    /// devices that have never reported.
    pub async fn latest_per_device(
        &self,
    ) -> Result<Vec<(Device, Option<Reading>)>, sqlx::Error> {
        #[derive(sqlx::FromRow)]
        struct Row {
            #[sqlx(flatten)]
            device: DeviceEntity,
            reading_id: Option<i64>,
            reading_timestamp: Option<chrono::DateTime<chrono::Utc>>,
            fill_alert: Option<String>,
            count: Option<i32>,
            refer_val: Option<i32>,
            tamper: Option<String>,
            total_usage: Option<i32>,
            battery_percentage: Option<f64>,
            power_status: Option<String>,
            device_timestamp: Option<String>,
        }

        let timer = QueryTimer::start("latest_per_device");
        let rows = sqlx::query_as::<_, Row>(
            r#"
            SELECT d.id, d.device_code, d.name, d.floor_number, d.room_number, d.consumable_type, d.meter_capacity, d.refer_value, d.created_at,
                   r.id AS reading_id, r.timestamp AS reading_timestamp, r.fill_alert, r.count, r.refer_val, r.tamper,
                   r.total_usage, r.battery_percentage, r.power_status, r.device_timestamp
            FROM devices d
            LEFT JOIN LATERAL (
                SELECT *
                FROM readings
                WHERE device_id = d.id
                ORDER BY timestamp DESC, id DESC
                LIMIT 1
            ) r ON TRUE
            ORDER BY d.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        timer.finish();

        Ok(rows
            .into_iter()
            .map(|row| {
                let device: Device = row.device.into();
                let reading = match (row.reading_id, row.reading_timestamp) {
                    (Some(id), Some(timestamp)) => Some(Reading {
                        id,
                        device_id: device.id,
                        timestamp,
                        fill_alert: row.fill_alert,
                        count: row.count.unwrap_or_default(),
                        refer_val: row.refer_val.unwrap_or_default(),
                        tamper: row.tamper,
                        total_usage: row.total_usage,
                        battery_percentage: row.battery_percentage,
                        power_status: row.power_status,
                        device_timestamp: row.device_timestamp,
                    }),
                    _ => None,
                };
                (device, reading)
            })
            .collect())
    }
}
