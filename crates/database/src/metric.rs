//! Emotion metric operations.

use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{EmotionMetric, MetricUpsert};

const SELECT_COLUMNS: &str = r#"
    SELECT id, user_id, period, emotions, mean_sentiment, summary, recommendation, updated_at
    FROM emotion_metrics
"#;

/// Insert or replace the metric for `(user_id, period)`.
pub async fn upsert_metric(
    pool: &SqlitePool,
    user_id: &str,
    metric: &MetricUpsert,
) -> Result<EmotionMetric> {
    sqlx::query(
        r#"
        INSERT INTO emotion_metrics (user_id, period, emotions, mean_sentiment, summary, recommendation)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(user_id, period) DO UPDATE SET
            emotions = excluded.emotions,
            mean_sentiment = excluded.mean_sentiment,
            summary = excluded.summary,
            recommendation = excluded.recommendation,
            updated_at = datetime('now')
        "#,
    )
    .bind(user_id)
    .bind(&metric.period)
    .bind(Json(&metric.emotions))
    .bind(metric.mean_sentiment)
    .bind(&metric.summary)
    .bind(&metric.recommendation)
    .execute(pool)
    .await?;

    tracing::debug!(user_id, period = %metric.period, "Upserted emotion metric");

    get_metric(pool, user_id, &metric.period).await
}

/// Get the metric for a period.
pub async fn get_metric(pool: &SqlitePool, user_id: &str, period: &str) -> Result<EmotionMetric> {
    sqlx::query_as::<_, EmotionMetric>(&format!("{SELECT_COLUMNS} WHERE user_id = ? AND period = ?"))
        .bind(user_id)
        .bind(period)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("EmotionMetric", period))
}

/// The most recently updated metric for a user.
pub async fn latest_metric(pool: &SqlitePool, user_id: &str) -> Result<Option<EmotionMetric>> {
    let metric = sqlx::query_as::<_, EmotionMetric>(&format!(
        "{SELECT_COLUMNS} WHERE user_id = ? ORDER BY updated_at DESC, id DESC LIMIT 1"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(metric)
}
