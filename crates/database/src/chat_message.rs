//! Chat turn storage.
//!
//! Turns are append-only: there is no update operation.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{ChatAnnotation, ChatMessageRecord};

const SELECT_COLUMNS: &str = r#"
    SELECT id, user_id, role, text, emotion, category, sentiment, summary, created_at
    FROM chat_messages
"#;

/// Append a chat turn for a user.
///
/// `role` must be `"user"` or `"assistant"`; the table rejects anything else.
pub async fn insert_message(
    pool: &SqlitePool,
    user_id: &str,
    role: &str,
    text: &str,
    annotation: &ChatAnnotation,
) -> Result<ChatMessageRecord> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO chat_messages (user_id, role, text, emotion, category, sentiment, summary)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(role)
    .bind(text)
    .bind(&annotation.emotion)
    .bind(&annotation.category)
    .bind(annotation.sentiment)
    .bind(&annotation.summary)
    .fetch_one(pool)
    .await?;

    tracing::debug!(user_id, message_id = id, role, "Stored chat message");

    get_message(pool, user_id, id).await
}

/// Get a chat turn owned by `user_id`.
pub async fn get_message(pool: &SqlitePool, user_id: &str, id: i64) -> Result<ChatMessageRecord> {
    sqlx::query_as::<_, ChatMessageRecord>(&format!("{SELECT_COLUMNS} WHERE id = ? AND user_id = ?"))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("ChatMessage", id))
}

/// All of a user's turns with an id below `before_id`, oldest first.
pub async fn history_before(
    pool: &SqlitePool,
    user_id: &str,
    before_id: i64,
) -> Result<Vec<ChatMessageRecord>> {
    let messages = sqlx::query_as::<_, ChatMessageRecord>(&format!(
        "{SELECT_COLUMNS} WHERE user_id = ? AND id < ? ORDER BY id ASC"
    ))
    .bind(user_id)
    .bind(before_id)
    .fetch_all(pool)
    .await?;

    Ok(messages)
}

/// All of a user's turns, oldest first.
pub async fn list_all(pool: &SqlitePool, user_id: &str) -> Result<Vec<ChatMessageRecord>> {
    history_before(pool, user_id, i64::MAX).await
}

/// The most recent `limit` turns (optionally below `before_id`), oldest first.
pub async fn list_recent(
    pool: &SqlitePool,
    user_id: &str,
    limit: i64,
    before_id: Option<i64>,
) -> Result<Vec<ChatMessageRecord>> {
    let mut messages = sqlx::query_as::<_, ChatMessageRecord>(&format!(
        "{SELECT_COLUMNS} WHERE user_id = ? AND id < ? ORDER BY id DESC LIMIT ?"
    ))
    .bind(user_id)
    .bind(before_id.unwrap_or(i64::MAX))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    messages.reverse();
    Ok(messages)
}

/// User turns that carry a lexicon annotation, oldest first.
pub async fn list_annotated_user_turns(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<ChatMessageRecord>> {
    let messages = sqlx::query_as::<_, ChatMessageRecord>(&format!(
        "{SELECT_COLUMNS} WHERE user_id = ? AND role = 'user' AND sentiment IS NOT NULL ORDER BY id ASC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(messages)
}

/// Count a user's own turns.
pub async fn count_user_turns(pool: &SqlitePool, user_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM chat_messages WHERE user_id = ? AND role = 'user'
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
