//! # Commands Module
//!
//! The boundary operations a UI calls. Every command takes the shared
//! [`DbState`](crate::state::DbState), plain inputs, and returns
//! `Result<T, ApiError>` where `T` serializes to camelCase JSON.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs          ◄─── You are here (exports, as-of parsing)
//! ├── user.rs         ◄─── Accounts and login
//! ├── store.rs        ◄─── Store CRUD
//! ├── unit.rs         ◄─── Unit CRUD
//! ├── product.rs      ◄─── Product CRUD + listing with balances
//! ├── transaction.rs  ◄─── Ledger row CRUD + filtered listing
//! └── ledger.rs       ◄─── Single-product balance, earliest activity
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Front end (CLI / UI)                                                  │
//! │  list_products(&state, Some("2024-01-31T18:00:00Z"))                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  parse_as_of ──► 2024-01-31   (bad input → VALIDATION_ERROR)           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  db.ledger().products_with_balances(..)                                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Vec<ProductView> ──► JSON                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod ledger;
pub mod product;
pub mod store;
pub mod transaction;
pub mod unit;
pub mod user;

use chrono::NaiveDate;
use stockbook_core::dates::normalize_as_of;

use crate::error::ApiError;

/// Turns a boundary as-of string (date, date-time or partial date) into a
/// calendar day. `None` or blank means unbounded.
pub(crate) fn parse_as_of(as_of: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    Ok(normalize_as_of(as_of)?)
}
