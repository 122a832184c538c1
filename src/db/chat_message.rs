use crate::models;
use crate::models::MessageRole;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::Instrument;
use uuid::Uuid;

/// Persists one user/ai exchange as a single transaction: the user row first,
/// then the reply row. `clock_timestamp()` advances within the transaction,
/// so `created_at` reflects insertion order.
pub async fn insert_exchange(
    pool: &PgPool,
    chat_id: Uuid,
    user_id: &str,
    user_text: &str,
    ai_text: &str,
) -> Result<(models::ChatMessage, models::ChatMessage), String> {
    let mut tx = pool.begin().await.map_err(|err| {
        tracing::error!("Failed to open transaction: {:?}", err);
        "Database error".to_string()
    })?;

    let user_row = insert_in_tx(&mut tx, chat_id, user_id, user_text, MessageRole::User).await?;
    let ai_row = insert_in_tx(&mut tx, chat_id, user_id, ai_text, MessageRole::Ai).await?;

    tx.commit().await.map_err(|err| {
        tracing::error!("Failed to commit message exchange: {:?}", err);
        "Failed to persist messages".to_string()
    })?;

    Ok((user_row, ai_row))
}

async fn insert_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    chat_id: Uuid,
    user_id: &str,
    message: &str,
    role: MessageRole,
) -> Result<models::ChatMessage, String> {
    let query_span = tracing::info_span!("Inserting chat message");
    sqlx::query_as::<_, models::ChatMessage>(
        r#"
        INSERT INTO chat_messages (id, chat_id, user_id, message, role, created_at)
        VALUES ($1, $2, $3, $4, $5, clock_timestamp())
        RETURNING id, chat_id, user_id, message, role, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(chat_id)
    .bind(user_id)
    .bind(message)
    .bind(role)
    .fetch_one(&mut **tx)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to insert chat message: {:?}", err);
        "Failed to persist message".to_string()
    })
}

pub async fn fetch_by_chat(
    pool: &PgPool,
    chat_id: Uuid,
) -> Result<Vec<models::ChatMessage>, String> {
    let query_span = tracing::info_span!("Fetching messages by chat");
    sqlx::query_as::<_, models::ChatMessage>(
        r#"
        SELECT id, chat_id, user_id, message, role, created_at
        FROM chat_messages
        WHERE chat_id = $1
        ORDER BY created_at
        "#,
    )
    .bind(chat_id)
    .fetch_all(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch chat messages: {:?}", err);
        "Database error".to_string()
    })
}
