//! User profile operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::UserProfile;

/// Get a user profile by ID.
pub async fn get_user(pool: &SqlitePool, id: &str) -> Result<UserProfile> {
    sqlx::query_as::<_, UserProfile>(
        r#"
        SELECT id, name, email, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::not_found("User", id))
}

/// Get a user profile if one exists.
pub async fn find_user(pool: &SqlitePool, id: &str) -> Result<Option<UserProfile>> {
    match get_user(pool, id).await {
        Ok(user) => Ok(Some(user)),
        Err(DatabaseError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Insert or update a user profile.
///
/// `None` fields keep their stored value.
pub async fn upsert_user(
    pool: &SqlitePool,
    id: &str,
    name: Option<&str>,
    email: Option<&str>,
) -> Result<UserProfile> {
    sqlx::query(
        r#"
        INSERT INTO users (id, name, email)
        VALUES (?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            name = COALESCE(excluded.name, users.name),
            email = COALESCE(excluded.email, users.email)
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .execute(pool)
    .await?;

    get_user(pool, id).await
}

/// Display name for prompts, falling back to `"Usuario"`.
pub async fn display_name(pool: &SqlitePool, id: &str) -> Result<String> {
    let name = find_user(pool, id)
        .await?
        .and_then(|user| user.name)
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());

    Ok(name.unwrap_or_else(|| "Usuario".to_string()))
}

/// Delete a user profile by ID.
pub async fn delete_user(pool: &SqlitePool, id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("User", id));
    }

    Ok(())
}
