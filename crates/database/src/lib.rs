//! SQLite persistence layer for MiDiarioIA.
//!
//! This crate provides async database operations for user profiles, diary
//! entries, chat turns, emotion metrics, feedback and wellbeing content using
//! SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{diary, Database, NewDiaryEntry};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:midiario.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Store a raw diary entry
//!     let entry = NewDiaryEntry {
//!         user_id: "c27fb365-0c84-4cf2-8555-814bb065e448".to_string(),
//!         entry_date: None,
//!         title: Some("Lunes".to_string()),
//!         content: "Hoy me sentí tranquilo".to_string(),
//!     };
//!     diary::insert_entry(db.pool(), &entry).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod chat_message;
pub mod diary;
pub mod error;
pub mod feedback;
pub mod metric;
pub mod models;
pub mod progress;
pub mod user;
pub mod validation;
pub mod wellbeing;

pub use error::{DatabaseError, Result};
pub use models::{
    Challenge, ChatAnnotation, ChatMessageRecord, DiaryEnrichment, DiaryEntry, DiaryFilter,
    EmotionMetric, Feedback, MetricUpsert, NewDiaryEntry, Page, Progress, Recommendation,
    UserChallenge, UserProfile,
};
pub use validation::ValidationError;
pub use wellbeing::{NewChallenge, NewRecommendation};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 10;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/midiario.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing; use a pool size of 1)
    /// let db = database::Database::connect_with_pool_size("sqlite::memory:", 1).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!("Connected to database: {} (pool size: {})", url, pool_size);

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// `LIKE` pattern matching `query` anywhere, with its wildcards taken
/// literally. Pair it with `ESCAPE '\'`.
pub(crate) fn contains_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
