//! # Schema Store
//!
//! Table definitions for Stockbook, created idempotently at startup.
//!
//! ## Tables and References
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   users            (independent)                                       │
//! │                                                                         │
//! │   stores ◄────┐                                                        │
//! │               ├── products.store_id  (nullable)                        │
//! │   units  ◄────┤                                                        │
//! │               └── products.unit_id   (nullable)                        │
//! │                          ▲                                              │
//! │                          └── transactions.product_id (required)        │
//! │                                                                         │
//! │  References are declared here. Whether SQLite enforces them depends on │
//! │  `DbConfig::enforce_foreign_keys`; the repositories check them on      │
//! │  insert/update either way.                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no migration history: every statement is `IF NOT EXISTS`, so
//! running [`ensure_schema`] against an existing database is a no-op. A new
//! column needs a one-off `ALTER TABLE` outside this module.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult, LogFailure};

/// Tables owned by this schema, in creation order.
pub const TABLES: &[&str] = &["users", "stores", "units", "products", "transactions"];

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        username      TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        role          TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS stores (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS units (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        name         TEXT NOT NULL,
        store_id     INTEGER,
        unit_id      INTEGER,
        created_date TEXT,
        expiry_date  TEXT,
        description  TEXT,
        FOREIGN KEY (store_id) REFERENCES stores(id),
        FOREIGN KEY (unit_id) REFERENCES units(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS transactions (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        product_id INTEGER NOT NULL,
        increase   INTEGER NOT NULL DEFAULT 0,
        decrease   INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        FOREIGN KEY (product_id) REFERENCES products(id)
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_transactions_product_date
        ON transactions (product_id, created_at)
    "#,
];

/// Creates every table and index that does not exist yet.
///
/// ## Safety
/// - Idempotent: safe to run on every startup
/// - Not transactional: a failure part-way leaves earlier tables in place,
///   and the next run picks up where it stopped
pub async fn ensure_schema(pool: &SqlitePool) -> DbResult<()> {
    info!("Ensuring database schema");

    for statement in STATEMENTS.iter().copied() {
        sqlx::query(statement)
            .execute(pool)
            .await
            .log_failure("ensure_schema")
            .map_err(|e| DbError::SchemaFailed(e.to_string()))?;
    }

    debug!(tables = TABLES.len(), "Schema ready");
    Ok(())
}

/// Lists the user tables present in the database (for diagnostics).
pub async fn table_names(pool: &SqlitePool) -> DbResult<Vec<String>> {
    let names: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT name FROM sqlite_master
        WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await
    .log_failure("table_names")?;

    Ok(names)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_schema_creates_all_tables() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let names = table_names(db.pool()).await.unwrap();
        for table in TABLES {
            assert!(names.iter().any(|n| n == table), "missing table {table}");
        }
    }

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = db
            .stores()
            .create(&stockbook_core::NewStore {
                name: "Main".to_string(),
                description: String::new(),
            })
            .await
            .unwrap();

        ensure_schema(db.pool()).await.unwrap();
        ensure_schema(db.pool()).await.unwrap();

        let stores = db.stores().list().await.unwrap();
        assert_eq!(stores, vec![store]);
    }

    #[tokio::test]
    async fn test_schema_can_be_skipped() {
        let db = Database::new(DbConfig::in_memory().create_schema(false))
            .await
            .unwrap();
        assert!(table_names(db.pool()).await.unwrap().is_empty());

        let err = db.stores().list().await.unwrap_err();
        assert!(matches!(err, DbError::Statement(_)));
    }
}
