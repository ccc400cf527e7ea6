//! Errors raised by the diary, chat and metrics stores.
//!
//! Lookups are always scoped to a user, so a row owned by someone else is
//! reported as [`DatabaseError::NotFound`] exactly like a missing one.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// No row with this id is visible to the requesting user.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A one-per-user record (such as a rating) was written twice.
    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },
}

impl DatabaseError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        DatabaseError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Translate a failed insert into the domain error it stands for.
    ///
    /// A unique violation means `entity` already exists; a foreign key
    /// violation means the `parent` row it points at does not.
    pub fn from_insert(
        err: sqlx::Error,
        entity: &'static str,
        parent: &'static str,
        id: impl ToString,
    ) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity,
                    id: id.to_string(),
                };
            }
            if db_err.is_foreign_key_violation() {
                return DatabaseError::not_found(parent, id);
            }
        }
        DatabaseError::Sqlx(err)
    }
}

pub type Result<T> = std::result::Result<T, DatabaseError>;
