//! Wellbeing recommendations and challenges.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::{Challenge, Page, Recommendation, UserChallenge};

/// Fields for a new recommendation.
#[derive(Debug, Clone, Default)]
pub struct NewRecommendation {
    pub title: String,
    pub source: Option<String>,
    pub url: Option<String>,
    pub category: Option<String>,
    pub published_on: Option<String>,
}

/// Fields for a new challenge.
#[derive(Debug, Clone, Default)]
pub struct NewChallenge {
    pub description: String,
    pub icon: Option<String>,
    pub difficulty: Option<String>,
}

/// Create a recommendation.
pub async fn create_recommendation(
    pool: &SqlitePool,
    new: &NewRecommendation,
) -> Result<Recommendation> {
    let recommendation = sqlx::query_as::<_, Recommendation>(
        r#"
        INSERT INTO recommendations (title, source, url, category, published_on)
        VALUES (?, ?, ?, ?, COALESCE(?, date('now')))
        RETURNING id, title, source, url, category, published_on
        "#,
    )
    .bind(&new.title)
    .bind(&new.source)
    .bind(&new.url)
    .bind(&new.category)
    .bind(&new.published_on)
    .fetch_one(pool)
    .await?;

    Ok(recommendation)
}

fn push_recommendation_filters<'a>(
    builder: &mut QueryBuilder<'a, Sqlite>,
    category: Option<&'a str>,
    query: Option<&'a str>,
) {
    builder.push(" WHERE 1 = 1");
    if let Some(category) = category {
        builder.push(" AND category = ").push_bind(category);
    }
    if let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = crate::contains_pattern(query);
        builder
            .push(" AND (title LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR source LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
}

/// List recommendations, newest publication first.
pub async fn list_recommendations(
    pool: &SqlitePool,
    category: Option<&str>,
    query: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Page<Recommendation>> {
    let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM recommendations");
    push_recommendation_filters(&mut count_query, category, query);
    let total: i64 = count_query.build_query_scalar().fetch_one(pool).await?;

    let mut list_query = QueryBuilder::<Sqlite>::new(
        "SELECT id, title, source, url, category, published_on FROM recommendations",
    );
    push_recommendation_filters(&mut list_query, category, query);
    list_query
        .push(" ORDER BY published_on DESC, id DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);
    let items = list_query
        .build_query_as::<Recommendation>()
        .fetch_all(pool)
        .await?;

    Ok(Page { items, total })
}

/// Create a challenge. Difficulty defaults to `"facil"`.
pub async fn create_challenge(pool: &SqlitePool, new: &NewChallenge) -> Result<Challenge> {
    let challenge = sqlx::query_as::<_, Challenge>(
        r#"
        INSERT INTO challenges (description, icon, difficulty)
        VALUES (?, ?, COALESCE(?, 'facil'))
        RETURNING id, description, icon, difficulty, created_on
        "#,
    )
    .bind(&new.description)
    .bind(&new.icon)
    .bind(&new.difficulty)
    .fetch_one(pool)
    .await?;

    Ok(challenge)
}

/// List challenges, newest first, optionally filtered by difficulty.
pub async fn list_challenges(
    pool: &SqlitePool,
    difficulty: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Page<Challenge>> {
    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM challenges WHERE (?1 IS NULL OR difficulty = ?1)
        "#,
    )
    .bind(difficulty)
    .fetch_one(pool)
    .await?;

    let items = sqlx::query_as::<_, Challenge>(
        r#"
        SELECT id, description, icon, difficulty, created_on
        FROM challenges
        WHERE (?1 IS NULL OR difficulty = ?1)
        ORDER BY created_on DESC, id DESC
        LIMIT ?2 OFFSET ?3
        "#,
    )
    .bind(difficulty)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(Page { items, total })
}

/// Assign a challenge to a user.
///
/// Unknown challenges are [`DatabaseError::NotFound`]; assigning the same
/// challenge twice is [`DatabaseError::AlreadyExists`].
pub async fn assign_challenge(
    pool: &SqlitePool,
    user_id: &str,
    challenge_id: i64,
) -> Result<UserChallenge> {
    sqlx::query_as::<_, UserChallenge>(
        r#"
        INSERT INTO user_challenges (user_id, challenge_id)
        VALUES (?, ?)
        RETURNING id, user_id, challenge_id, completed, completed_at
        "#,
    )
    .bind(user_id)
    .bind(challenge_id)
    .fetch_one(pool)
    .await
    .map_err(|e| DatabaseError::from_insert(e, "UserChallenge", "Challenge", challenge_id))
}

/// Mark an assignment completed. Completing twice keeps the first timestamp.
pub async fn complete_challenge(
    pool: &SqlitePool,
    user_id: &str,
    assignment_id: i64,
) -> Result<UserChallenge> {
    sqlx::query_as::<_, UserChallenge>(
        r#"
        UPDATE user_challenges
        SET completed = 1, completed_at = COALESCE(completed_at, datetime('now'))
        WHERE id = ? AND user_id = ?
        RETURNING id, user_id, challenge_id, completed, completed_at
        "#,
    )
    .bind(assignment_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::not_found("UserChallenge", assignment_id))
}

/// A user's assignments, newest first, optionally filtered by completion.
pub async fn list_user_challenges(
    pool: &SqlitePool,
    user_id: &str,
    completed: Option<bool>,
) -> Result<Vec<UserChallenge>> {
    let rows = sqlx::query_as::<_, UserChallenge>(
        r#"
        SELECT id, user_id, challenge_id, completed, completed_at
        FROM user_challenges
        WHERE user_id = ?1 AND (?2 IS NULL OR completed = ?2)
        ORDER BY id DESC
        "#,
    )
    .bind(user_id)
    .bind(completed)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
