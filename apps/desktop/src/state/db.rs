//! # Database State
//!
//! Wraps the `Database` handle together with the settings commands need.
//!
//! ## Thread Safety
//! The `Database` from `stockbook-db` contains a `SqlitePool` which is
//! inherently thread-safe. Multiple commands can execute queries
//! concurrently without explicit locking.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! pub async fn list_products(
//!     db: &DbState,
//!     as_of: Option<String>,
//! ) -> Result<Vec<ProductView>, ApiError> {
//!     let rows = db.inner().ledger().products_with_balances(as_of).await?;
//!     ...
//! }
//! ```

use stockbook_core::DEFAULT_EXPIRY_WARNING_DAYS;
use stockbook_db::Database;

/// Database handle plus the read-only settings commands consult.
#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
    expiry_warning_days: i64,
}

impl DbState {
    /// Creates a new DbState with the default expiry window.
    pub fn new(db: Database) -> Self {
        DbState {
            db,
            expiry_warning_days: DEFAULT_EXPIRY_WARNING_DAYS,
        }
    }

    /// Sets the window used for `expiringSoon` flags.
    pub fn with_expiry_warning_days(mut self, days: i64) -> Self {
        self.expiry_warning_days = days;
        self
    }

    /// Returns a reference to the inner Database.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let stores = db_state.inner().stores().list().await?;
    /// ```
    pub fn inner(&self) -> &Database {
        &self.db
    }

    pub fn expiry_warning_days(&self) -> i64 {
        self.expiry_warning_days
    }
}
