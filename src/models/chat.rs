use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Chat {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    // storage detail, keeps pagination deterministic; not part of the API shape
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
}
