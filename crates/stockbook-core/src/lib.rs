//! # stockbook-core: Pure Domain Logic for Stockbook
//!
//! This crate holds the inventory domain: entity types, the stock ledger
//! reduction, as-of date handling and input validation. It has zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockbook Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (React, out of tree)                │   │
//! │  │    Products ──► Transactions ──► Stores/Units ──► Users        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ command boundary                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/desktop commands                        │   │
//! │  │    list_products, add_transaction, product_balance, ...        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockbook-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  ledger   │  │   dates   │  │ validation│  │   │
//! │  │   │  Product  │  │  totals   │  │  as-of    │  │   rules   │  │   │
//! │  │   │  Txn      │  │  balance  │  │  normalize│  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  stockbook-db (Database Layer)                  │   │
//! │  │          SQLite schema, repositories, query composer            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entity types (User, Store, Unit, Product, StockTransaction)
//! - [`ledger`] - Balance reduction over transaction history
//! - [`dates`] - As-of date normalization and calendar-day formatting
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use stockbook_core::ledger;
//! use stockbook_core::StockTransaction;
//!
//! let day = |d: &str| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap();
//! let history = vec![
//!     StockTransaction { id: 1, product_id: 1, increase: 100, decrease: 0, created_at: day("2024-01-01") },
//!     StockTransaction { id: 2, product_id: 1, increase: 0, decrease: 30, created_at: day("2024-01-15") },
//!     StockTransaction { id: 3, product_id: 1, increase: 20, decrease: 0, created_at: day("2024-02-01") },
//! ];
//!
//! assert_eq!(ledger::balance_as_of(&history, Some(day("2024-01-31"))), 70);
//! assert_eq!(ledger::balance(&history), 90);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod dates;
pub mod error;
pub mod ledger;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use ledger::{LedgerEntry, LedgerTotals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage and wire format for calendar dates (`yyyy-MM-dd`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Products expiring within this many days are flagged in listings.
pub const DEFAULT_EXPIRY_WARNING_DAYS: i64 = 30;

/// Maximum length of a name field (product, store, unit, username).
pub const MAX_NAME_LENGTH: usize = 200;

/// Largest quantity a single transaction may move.
pub const MAX_QUANTITY: i64 = 1_000_000_000_000;

/// Maximum length of a description field.
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;
