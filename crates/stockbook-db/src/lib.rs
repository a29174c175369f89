//! # stockbook-db: Database Layer for Stockbook
//!
//! This crate provides database access for the Stockbook inventory ledger.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockbook Data Flow                              │
//! │                                                                         │
//! │  Command (list_products, create_transaction, ...)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  stockbook-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │    Ledger    │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (ledger.rs) │  │   │
//! │  │   │               │    │ UserRepo      │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ StoreRepo     │◄───│ balance()    │  │   │
//! │  │   │ Schema setup  │    │ UnitRepo      │    │ per-product  │  │   │
//! │  │   │               │    │ ProductRepo   │    │ tasks        │  │   │
//! │  │   │               │    │ TransactionRe │    │              │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │                               │   │
//! │  │                        ┌───────▼───────┐                       │   │
//! │  │                        │ Query Composer│                       │   │
//! │  │                        │  (query.rs)   │                       │   │
//! │  │                        └───────────────┘                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <data dir>/stockbook.db                                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`schema`] - Idempotent table creation
//! - [`query`] - Joined/filtered read statements
//! - [`repository`] - Per-table CRUD
//! - [`ledger`] - Balance aggregation
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockbook_db::{Database, DbConfig};
//!
//! // Opens the file and creates missing tables
//! let db = Database::new(DbConfig::new("path/to/stockbook.db")).await?;
//!
//! // Use repositories
//! let rice = db.products().create(&NewProduct { name: "Rice".into(), ..Default::default() }).await?;
//! db.transactions().create(&NewTransaction::increase(rice.id, 100)).await?;
//!
//! // Derive balances
//! let on_hand = db.ledger().balance(rice.id, None).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod pool;
pub mod query;
pub mod repository;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use ledger::{attach_balances, Ledger, TransactionSource};
pub use pool::{Database, DbConfig};
pub use query::TransactionFilter;

// Repository re-exports for convenience
pub use repository::product::ProductRepository;
pub use repository::store::StoreRepository;
pub use repository::transaction::TransactionRepository;
pub use repository::unit::UnitRepository;
pub use repository::user::UserRepository;
