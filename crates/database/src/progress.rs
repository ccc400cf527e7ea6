//! Per-user progress summary.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::Progress;
use crate::{chat_message, diary, metric};

/// Compute a user's progress. A user with no data gets zeros.
pub async fn get_progress(pool: &SqlitePool, user_id: &str) -> Result<Progress> {
    let total_reflections = diary::count_entries(pool, user_id).await?;
    let interactions_with_assistant = chat_message::count_user_turns(pool, user_id).await?;

    let challenges_completed = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM user_challenges WHERE user_id = ? AND completed = 1
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    let mean_sentiment = sqlx::query_scalar::<_, Option<f64>>(
        r#"
        SELECT AVG(sentiment) FROM diary_entries WHERE user_id = ? AND sentiment IS NOT NULL
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?
    .map(|mean| (mean * 100.0).round() / 100.0);

    let current_recommendation = metric::latest_metric(pool, user_id)
        .await?
        .map(|metric| metric.recommendation);

    Ok(Progress {
        user_id: user_id.to_string(),
        total_reflections,
        challenges_completed,
        interactions_with_assistant,
        mean_sentiment,
        current_recommendation,
    })
}
