//! Notification repository for database operations.

use domain::models::{Notification, NotificationDraft};
use sqlx::PgPool;

use crate::entities::NotificationEntity;

const NOTIFICATION_COLUMNS: &str = "id, device_id, reading_id, notification_type, title, message, priority, fill_alert, tamper, battery_percentage, power_status, is_read, created_at";

/// Repository for notification database operations.
#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a draft unless a notification for the same
    /// `(reading_id, notification_type)` already exists. The unique index
    /// makes replays a no-op; `None` means the row was already there.
    pub async fn create_if_absent(
        &self,
        draft: &NotificationDraft,
    ) -> Result<Option<Notification>, sqlx::Error> {
        let entity = sqlx::query_as::<_, NotificationEntity>(&format!(
            r#"
            INSERT INTO notifications (device_id, reading_id, notification_type, title, message, priority, fill_alert, tamper, battery_percentage, power_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (reading_id, notification_type) DO NOTHING
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(draft.device_id)
        .bind(draft.reading_id)
        .bind(draft.kind.to_string())
        .bind(&draft.title)
        .bind(&draft.message)
        .bind(draft.priority)
        .bind(&draft.snapshot.fill_alert)
        .bind(draft.snapshot.tamper)
        .bind(draft.snapshot.battery_percentage)
        .bind(&draft.snapshot.power_status)
        .fetch_optional(&self.pool)
        .await?;

        entity.map(try_into_domain).transpose()
    }

    /// Find a notification by id.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Notification>, sqlx::Error> {
        let entity = sqlx::query_as::<_, NotificationEntity>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS}
            FROM notifications
            WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        entity.map(try_into_domain).transpose()
    }

    /// List notifications for one device, priority then recency order.
    pub async fn list_for_device(&self, device_id: i64) -> Result<Vec<Notification>, sqlx::Error> {
        let entities = sqlx::query_as::<_, NotificationEntity>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS}
            FROM notifications
            WHERE device_id = $1
            ORDER BY priority DESC, created_at DESC
            "#
        ))
        .bind(device_id)
        .fetch_all(&self.pool)
        .await?;

        entities.into_iter().map(try_into_domain).collect()
    }

    /// Count of unread notifications across the fleet.
    pub async fn unread_count(&self) -> Result<i64, sqlx::Error> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM notifications WHERE is_read = FALSE")
                .fetch_one(&self.pool)
                .await?;
        Ok(count.0)
    }

    /// Mark one notification as read.
    pub async fn mark_read(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE id = $1 AND is_read = FALSE
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Mark every notification as read; returns the number updated.
    pub async fn mark_all_read(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE notifications SET is_read = TRUE WHERE is_read = FALSE")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete one notification.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every notification for a device; returns the number deleted.
    pub async fn delete_all_for_device(&self, device_id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE device_id = $1")
            .bind(device_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

fn try_into_domain(entity: NotificationEntity) -> Result<Notification, sqlx::Error> {
    Notification::try_from(entity).map_err(|e| sqlx::Error::Decode(e.into()))
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_notification_repository_new() {
        // Compile-time test - repository should be constructable.
    }
}
