//! # Database Error Types
//!
//! Lookups that find nothing return `Ok(None)`, and duplicate names on
//! create return `CreateOutcome::Conflict`. `DbError` covers everything a
//! caller cannot branch on as a normal result.
//!
//! ```text
//! ValidationError ──► DbError::Validation        (nothing written)
//! UNIQUE index    ──► DbError::UniqueViolation   (restore / rename clash)
//! FOREIGN KEY     ──► DbError::ForeignKeyViolation
//! SQLITE_BUSY     ──► DbError::Busy              (busy timeout elapsed)
//! ```

use coop_core::ValidationError;
use sqlx::error::ErrorKind;
use thiserror::Error;

/// SQLite primary result code for `SQLITE_BUSY`; extended codes keep it in
/// the low byte.
const SQLITE_BUSY: i32 = 5;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// A write targeted a row that doesn't exist.
    ///
    /// - Stock adjustment on an unknown product id
    /// - Variant stock adjustment on an unknown variant name
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A unique index rejected the write.
    ///
    /// - Restoring a product whose name was reused meanwhile
    /// - Renaming a category to a live category's name
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// Unknown category on product create, unknown product on variant insert.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Caller input failed validation; nothing was written.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// The write lock stayed taken for the whole busy timeout.
    #[error("Database busy: {0}")]
    Busy(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// No pooled connection became free within the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Returns true for a unique-index violation.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DbError::UniqueViolation { .. })
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();

                match db_err.kind() {
                    ErrorKind::UniqueViolation => DbError::UniqueViolation {
                        // "UNIQUE constraint failed: products.product_name"
                        constraint: message
                            .rsplit(": ")
                            .next()
                            .unwrap_or_default()
                            .to_string(),
                    },
                    ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation { message },
                    _ => {
                        let busy = db_err
                            .code()
                            .and_then(|code| code.parse::<i32>().ok())
                            .is_some_and(|code| code & 0xff == SQLITE_BUSY);
                        if busy {
                            DbError::Busy(message)
                        } else {
                            DbError::QueryFailed(message)
                        }
                    }
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),

            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
