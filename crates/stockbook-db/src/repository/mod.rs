//! # Repository Module
//!
//! One repository per table, each a thin handle over the shared pool.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Layer                                     │
//! │                                                                         │
//! │  Command (apps/desktop)                                                │
//! │       │                                                                 │
//! │       │  db.products().get_by_id(1)                                    │
//! │       ▼                                                                 │
//! │  XxxRepository                                                         │
//! │  ├── list(&self)                                                       │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── create(&self, &NewXxx)        → Xxx (generated id + echo)         │
//! │  ├── update(&self, id, &NewXxx)    → Xxx (echo, even if no row)        │
//! │  └── delete(&self, id)             → DeleteOutcome { success: true }   │
//! │       │                                                                 │
//! │       │  validate → bind → execute → log_failure                       │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`UserRepository`](user::UserRepository) - Accounts and password checks
//! - [`StoreRepository`](store::StoreRepository) - Stores
//! - [`UnitRepository`](unit::UnitRepository) - Units of measure
//! - [`ProductRepository`](product::ProductRepository) - Products with joined names
//! - [`TransactionRepository`](transaction::TransactionRepository) - Ledger rows

pub mod product;
pub mod store;
pub mod transaction;
pub mod unit;
pub mod user;
