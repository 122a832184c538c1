use crate::models;
use sqlx::PgPool;
use tracing::Instrument;
use uuid::Uuid;

pub async fn insert(pool: &PgPool, user_id: &str, title: &str) -> Result<models::Chat, String> {
    let query_span = tracing::info_span!("Inserting chat into database");
    sqlx::query_as::<_, models::Chat>(
        r#"
        INSERT INTO chats (id, user_id, title, created_at)
        VALUES ($1, $2, $3, now())
        RETURNING id, user_id, title, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(title)
    .fetch_one(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to insert chat: {:?}", err);
        "Failed to create chat".to_string()
    })
}

pub async fn fetch(pool: &PgPool, id: Uuid) -> Result<Option<models::Chat>, String> {
    let query_span = tracing::info_span!("Fetching chat by ID");
    sqlx::query_as::<_, models::Chat>(
        r#"
        SELECT id, user_id, title, created_at
        FROM chats
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch chat: {:?}", err);
        "Database error".to_string()
    })
}

// ordered by creation time so offset pagination stays well-defined
pub async fn fetch_by_user(
    pool: &PgPool,
    user_id: &str,
    skip: i64,
    limit: i64,
) -> Result<Vec<models::Chat>, String> {
    let query_span = tracing::info_span!("Fetching chats by user");
    sqlx::query_as::<_, models::Chat>(
        r#"
        SELECT id, user_id, title, created_at
        FROM chats
        WHERE user_id = $1
        ORDER BY created_at
        OFFSET $2 LIMIT $3
        "#,
    )
    .bind(user_id)
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch chats: {:?}", err);
        "Database error".to_string()
    })
}
