//! # State Module
//!
//! Process-wide state, built once at startup and passed to every command.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  AppConfig::load(--config)                                             │
//! │       │                                                                 │
//! │       ├── db_config() ──► Database::new() ──► DbState                  │
//! │       │                                        │                        │
//! │       └── expiry_warning_days ─────────────────┘                        │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: Database has internal connection pool (thread-safe)        │
//! │  • AppConfig: Read-only after initialization                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;

pub use config::{AppConfig, DatabaseSettings, InventorySettings, DEFAULT_LOG_FILTER};
pub use db::DbState;
