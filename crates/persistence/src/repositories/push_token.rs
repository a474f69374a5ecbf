//! Push token repository for database operations.

use domain::models::PushToken;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::PushTokenEntity;

/// Repository for push token database operations.
#[derive(Clone)]
pub struct PushTokenRepository {
    pool: PgPool,
}

impl PushTokenRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register or refresh a token. Idempotent on the token string: a
    /// re-registration updates the owner and subscription scope.
    pub async fn upsert(
        &self,
        user_id: Uuid,
        device_id: Option<i64>,
        token: &str,
    ) -> Result<PushToken, sqlx::Error> {
        let entity = sqlx::query_as::<_, PushTokenEntity>(
            r#"
            INSERT INTO push_tokens (user_id, device_id, token)
            VALUES ($1, $2, $3)
            ON CONFLICT (token) DO UPDATE
            SET user_id = EXCLUDED.user_id,
                device_id = EXCLUDED.device_id,
                updated_at = NOW()
            RETURNING id, user_id, device_id, token, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(device_id)
        .bind(token)
        .fetch_one(&self.pool)
        .await?;

        Ok(entity.into())
    }

    /// Tokens of interest for one device: bound to it, or fleet-wide.
    /// Tokens are unique, so the result is already deduplicated.
    pub async fn list_for_device(&self, device_id: i64) -> Result<Vec<PushToken>, sqlx::Error> {
        let entities = sqlx::query_as::<_, PushTokenEntity>(
            r#"
            SELECT id, user_id, device_id, token, created_at, updated_at
            FROM push_tokens
            WHERE device_id = $1 OR device_id IS NULL
            ORDER BY id
            "#,
        )
        .bind(device_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// Remove a token, e.g. after the provider rejected it.
    pub async fn delete_by_token(&self, token: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM push_tokens WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_push_token_repository_new() {
        // Compile-time test - repository should be constructable.
    }
}
