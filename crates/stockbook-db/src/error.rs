//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼  .log_failure("operation")  ← logged here, exactly once        │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (desktop app) ← Serialized for the UI                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use stockbook_core::ValidationError;
use thiserror::Error;
use tracing::error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `fetch_one` returns no rows
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key violation, raised by SQLite or by the repository's own
    /// reference checks.
    ///
    /// ## When This Occurs
    /// - Transaction for a non-existent product_id
    /// - Product pointing at a non-existent store_id / unit_id
    /// - Deleting a referenced row while foreign keys are enforced
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Statement could not be prepared.
    ///
    /// ## When This Occurs
    /// - SQL syntax error
    /// - Schema mismatch (missing table or column)
    #[error("Statement failed: {0}")]
    Statement(String),

    /// Input rejected before any SQL ran.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Schema creation failed at startup.
    #[error("Schema setup failed: {0}")]
    SchemaFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Credential hashing failed.
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error (I/O, decode, ...).
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

    /// Creates a ForeignKeyViolation for a dangling reference.
    pub fn dangling(field: &str, id: i64) -> Self {
        DbError::ForeignKeyViolation {
            message: format!("{} {} does not exist", field, id),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint / statement
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => classify_message(db_err.message()),

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

/// Maps SQLite's error text to a category.
///
/// SQLite reports constraint failures and prepare errors as plain messages:
/// `UNIQUE constraint failed: <table>.<column>`, `FOREIGN KEY constraint
/// failed`, `no such table: <name>`, `near "X": syntax error`.
fn classify_message(msg: &str) -> DbError {
    if let Some(field) = msg.split("UNIQUE constraint failed: ").nth(1) {
        DbError::UniqueViolation {
            field: field.to_string(),
            value: "unknown".to_string(),
        }
    } else if msg.contains("FOREIGN KEY constraint failed") {
        DbError::ForeignKeyViolation {
            message: msg.to_string(),
        }
    } else if msg.contains("syntax error")
        || msg.contains("no such table")
        || msg.contains("no such column")
        || msg.contains("has no column")
    {
        DbError::Statement(msg.to_string())
    } else {
        DbError::QueryFailed(msg.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Logs a storage failure with the operation that hit it, then converts it.
///
/// ## Usage
/// ```rust,ignore
/// let rows = sqlx::query_as::<_, Store>("SELECT ...")
///     .fetch_all(&self.pool)
///     .await
///     .log_failure("list_stores")?;
/// ```
pub trait LogFailure<T> {
    fn log_failure(self, operation: &'static str) -> DbResult<T>;
}

impl<T> LogFailure<T> for Result<T, sqlx::Error> {
    fn log_failure(self, operation: &'static str) -> DbResult<T> {
        self.map_err(|err| {
            let err = DbError::from(err);
            error!(operation, error = %err, "Database operation failed");
            err
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
