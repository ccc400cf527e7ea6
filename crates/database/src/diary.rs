//! Diary entry operations.
//!
//! Every read and write is scoped to the owning user; an entry that exists
//! but belongs to someone else is reported as not found.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::{DiaryEnrichment, DiaryEntry, DiaryFilter, NewDiaryEntry, Page};

const SELECT_COLUMNS: &str = r#"
    SELECT id, user_id, entry_date, title, content, summary, predominant_emotion,
           emotion_category, sentiment, model_source, created_at, updated_at
    FROM diary_entries
"#;

fn not_found(id: i64) -> DatabaseError {
    DatabaseError::not_found("DiaryEntry", id)
}

/// Insert a raw diary entry with no derived fields.
pub async fn insert_entry(pool: &SqlitePool, entry: &NewDiaryEntry) -> Result<DiaryEntry> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO diary_entries (user_id, entry_date, title, content)
        VALUES (?, COALESCE(?, date('now')), ?, ?)
        RETURNING id
        "#,
    )
    .bind(&entry.user_id)
    .bind(&entry.entry_date)
    .bind(&entry.title)
    .bind(&entry.content)
    .fetch_one(pool)
    .await?;

    get_entry(pool, &entry.user_id, id).await
}

/// Get a diary entry owned by `user_id`.
pub async fn get_entry(pool: &SqlitePool, user_id: &str, id: i64) -> Result<DiaryEntry> {
    sqlx::query_as::<_, DiaryEntry>(&format!("{SELECT_COLUMNS} WHERE id = ? AND user_id = ?"))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Store the derived analysis of an entry.
pub async fn set_enrichment(
    pool: &SqlitePool,
    user_id: &str,
    id: i64,
    enrichment: &DiaryEnrichment,
) -> Result<DiaryEntry> {
    let result = sqlx::query(
        r#"
        UPDATE diary_entries
        SET summary = ?, predominant_emotion = ?, emotion_category = ?,
            sentiment = ?, model_source = ?, updated_at = datetime('now')
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(&enrichment.summary)
    .bind(&enrichment.predominant_emotion)
    .bind(&enrichment.emotion_category)
    .bind(enrichment.sentiment)
    .bind(&enrichment.model_source)
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }

    get_entry(pool, user_id, id).await
}

/// Clear all derived fields of an entry.
pub async fn clear_enrichment(pool: &SqlitePool, user_id: &str, id: i64) -> Result<DiaryEntry> {
    let result = sqlx::query(
        r#"
        UPDATE diary_entries
        SET summary = NULL, predominant_emotion = NULL, emotion_category = NULL,
            sentiment = NULL, model_source = NULL, updated_at = datetime('now')
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }

    get_entry(pool, user_id, id).await
}

/// Update the title and/or content of an entry.
///
/// `None` leaves the field unchanged and `Some(None)` clears the title.
/// Derived fields are not touched.
pub async fn update_entry(
    pool: &SqlitePool,
    user_id: &str,
    id: i64,
    title: Option<Option<&str>>,
    content: Option<&str>,
) -> Result<DiaryEntry> {
    let result = sqlx::query(
        r#"
        UPDATE diary_entries
        SET title = CASE WHEN ? THEN ? ELSE title END,
            content = COALESCE(?, content),
            updated_at = datetime('now')
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(title.is_some())
    .bind(title.flatten())
    .bind(content)
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }

    get_entry(pool, user_id, id).await
}

/// Delete an entry owned by `user_id`.
pub async fn delete_entry(pool: &SqlitePool, user_id: &str, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM diary_entries
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }

    Ok(())
}

fn push_filters<'a>(
    builder: &mut QueryBuilder<'a, Sqlite>,
    user_id: &'a str,
    filter: &'a DiaryFilter,
) {
    builder.push(" WHERE user_id = ").push_bind(user_id);

    if let Some(from) = &filter.from_date {
        builder.push(" AND entry_date >= ").push_bind(from);
    }
    if let Some(to) = &filter.to_date {
        builder.push(" AND entry_date <= ").push_bind(to);
    }
    if let Some(query) = filter.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = crate::contains_pattern(query);
        builder
            .push(" AND (title LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR content LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
}

/// List a user's entries, newest first, with the total matching count.
pub async fn list_entries(
    pool: &SqlitePool,
    user_id: &str,
    filter: &DiaryFilter,
    limit: i64,
    offset: i64,
) -> Result<Page<DiaryEntry>> {
    let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM diary_entries");
    push_filters(&mut count_query, user_id, filter);
    let total: i64 = count_query.build_query_scalar().fetch_one(pool).await?;

    let mut list_query = QueryBuilder::<Sqlite>::new(SELECT_COLUMNS);
    push_filters(&mut list_query, user_id, filter);
    list_query
        .push(" ORDER BY entry_date DESC, id DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);
    let items = list_query
        .build_query_as::<DiaryEntry>()
        .fetch_all(pool)
        .await?;

    Ok(Page { items, total })
}

/// All entries of a user that carry derived analysis, oldest first.
pub async fn list_enriched_entries(pool: &SqlitePool, user_id: &str) -> Result<Vec<DiaryEntry>> {
    let entries = sqlx::query_as::<_, DiaryEntry>(&format!(
        "{SELECT_COLUMNS} WHERE user_id = ? AND model_source IS NOT NULL ORDER BY entry_date, id"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// Count a user's entries.
pub async fn count_entries(pool: &SqlitePool, user_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM diary_entries WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
