//! Push token entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the push_tokens table.
#[derive(Debug, Clone, FromRow)]
pub struct PushTokenEntity {
    pub id: i64,
    pub user_id: Uuid,
    pub device_id: Option<i64>,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PushTokenEntity> for domain::models::PushToken {
    fn from(entity: PushTokenEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            device_id: entity.device_id,
            token: entity.token,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
