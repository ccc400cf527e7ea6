//! Feedback on assistant replies.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Feedback;

/// Record a rating for a chat message.
///
/// A user can rate each message once; a second rating is reported as
/// [`DatabaseError::AlreadyExists`].
pub async fn create_feedback(
    pool: &SqlitePool,
    user_id: &str,
    message_id: i64,
    score: i64,
    comment: Option<&str>,
) -> Result<Feedback> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO feedback (user_id, message_id, score, comment)
        VALUES (?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(message_id)
    .bind(score)
    .bind(comment)
    .fetch_one(pool)
    .await
    .map_err(|e| DatabaseError::from_insert(e, "Feedback", "ChatMessage", message_id))?;

    sqlx::query_as::<_, Feedback>(
        r#"
        SELECT id, user_id, message_id, score, comment, created_at
        FROM feedback
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await
    .map_err(Into::into)
}

/// All feedback given by a user, newest first.
pub async fn list_feedback(pool: &SqlitePool, user_id: &str) -> Result<Vec<Feedback>> {
    let rows = sqlx::query_as::<_, Feedback>(
        r#"
        SELECT id, user_id, message_id, score, comment, created_at
        FROM feedback
        WHERE user_id = ?
        ORDER BY id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
