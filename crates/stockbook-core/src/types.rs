//! # Domain Types
//!
//! Entity types used throughout Stockbook.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Store       │   │    Product      │   │ StockTransaction│       │
//! │  │  ─────────────  │◄──│  ─────────────  │◄──│  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  name           │   │  store_id  (?)  │   │  product_id     │       │
//! │  └─────────────────┘   │  unit_id   (?)  │   │  increase       │       │
//! │  ┌─────────────────┐   │  created_date   │   │  decrease       │       │
//! │  │      Unit       │◄──│  expiry_date    │   │  created_at     │       │
//! │  │  ─────────────  │   └─────────────────┘   └─────────────────┘       │
//! │  │  id, name       │                                                    │
//! │  └─────────────────┘   ┌─────────────────┐                             │
//! │                        │      User       │  (independent)              │
//! │                        │  id, username   │                             │
//! │                        │  role           │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Input vs Record Types
//! Every entity has a `New*` input type (what the caller supplies) and a
//! record type (input + generated `id`). Create and update both echo the
//! record type back to the caller.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// User
// =============================================================================

/// A user account. The password never leaves the database layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Flat role string ("admin", "clerk", ...). Not interpreted here.
    pub role: String,
}

/// Input for creating or replacing a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewUser {
    pub username: String,
    /// Plaintext as entered; hashed before it is stored.
    pub password: String,
    pub role: String,
}

impl NewUser {
    /// Echoes this input as a stored record with the given id.
    pub fn with_id(&self, id: i64) -> User {
        User {
            id,
            username: self.username.clone(),
            role: self.role.clone(),
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// A physical store or warehouse that products are kept in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Store {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// Input for creating or replacing a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewStore {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl NewStore {
    pub fn with_id(&self, id: i64) -> Store {
        Store {
            id,
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

// =============================================================================
// Unit
// =============================================================================

/// A unit of measure (kg, box, litre, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Unit {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// Input for creating or replacing a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewUnit {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl NewUnit {
    pub fn with_id(&self, id: i64) -> Unit {
        Unit {
            id,
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A stocked product.
///
/// `store_id` and `unit_id` are weak references: they may be `None`
/// (unassigned) and are only resolved to names through an explicit join
/// (see [`ProductDetails`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub store_id: Option<i64>,
    pub unit_id: Option<i64>,
    #[ts(as = "Option<String>")]
    pub created_date: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,
    pub description: Option<String>,
}

impl Product {
    /// Checks whether the product expires within `window_days` of `today`.
    ///
    /// Already-expired products count as expiring soon. Products without an
    /// expiry date never do.
    pub fn is_expiring_soon(&self, today: NaiveDate, window_days: i64) -> bool {
        expires_within(self.expiry_date, today, window_days)
    }
}

/// Input for creating or replacing a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub store_id: Option<i64>,
    #[serde(default)]
    pub unit_id: Option<i64>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub created_date: Option<NaiveDate>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewProduct {
    pub fn with_id(&self, id: i64) -> Product {
        Product {
            id,
            name: self.name.clone(),
            store_id: self.store_id,
            unit_id: self.unit_id,
            created_date: self.created_date,
            expiry_date: self.expiry_date,
            description: self.description.clone(),
        }
    }
}

/// A product row joined with its store and unit names.
///
/// The names are `None` when the reference is unset or points at a row that
/// no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductDetails {
    pub id: i64,
    pub name: String,
    pub store_id: Option<i64>,
    pub unit_id: Option<i64>,
    #[ts(as = "Option<String>")]
    pub created_date: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub store_name: Option<String>,
    pub unit_name: Option<String>,
}

impl ProductDetails {
    /// Drops the joined names, leaving the stored product record.
    pub fn to_product(&self) -> Product {
        Product {
            id: self.id,
            name: self.name.clone(),
            store_id: self.store_id,
            unit_id: self.unit_id,
            created_date: self.created_date,
            expiry_date: self.expiry_date,
            description: self.description.clone(),
        }
    }

    pub fn is_expiring_soon(&self, today: NaiveDate, window_days: i64) -> bool {
        expires_within(self.expiry_date, today, window_days)
    }
}

/// A product listing row with its derived stock balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductWithBalance {
    #[serde(flatten)]
    pub product: ProductDetails,
    /// Σincrease − Σdecrease over the product's (date-bounded) history.
    pub balance: i64,
}

fn expires_within(expiry: Option<NaiveDate>, today: NaiveDate, window_days: i64) -> bool {
    match expiry {
        Some(expiry) => (expiry - today).num_days() < window_days,
        None => false,
    }
}

// =============================================================================
// Stock Transaction
// =============================================================================

/// One ledger entry: stock moving into or out of a product.
///
/// Exactly one of `increase` / `decrease` is expected to be nonzero, but
/// nothing enforces it; the balance simply nets both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockTransaction {
    pub id: i64,
    pub product_id: i64,
    pub increase: i64,
    pub decrease: i64,
    /// Calendar day only; same-day entries have no relative order.
    #[ts(as = "String")]
    pub created_at: NaiveDate,
}

/// Input for creating or replacing a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewTransaction {
    pub product_id: i64,
    #[serde(default)]
    pub increase: i64,
    #[serde(default)]
    pub decrease: i64,
    /// Defaults to today's local date on create when omitted.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub created_at: Option<NaiveDate>,
}

impl NewTransaction {
    /// Stock arriving for a product.
    pub fn increase(product_id: i64, quantity: i64) -> Self {
        NewTransaction {
            product_id,
            increase: quantity,
            decrease: 0,
            created_at: None,
        }
    }

    /// Stock leaving a product.
    pub fn decrease(product_id: i64, quantity: i64) -> Self {
        NewTransaction {
            product_id,
            increase: 0,
            decrease: quantity,
            created_at: None,
        }
    }

    /// Pins the transaction to a calendar day.
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.created_at = Some(date);
        self
    }

    /// Echoes this input as a stored record, using `date` when no explicit
    /// day was given.
    pub fn with_id(&self, id: i64, date: NaiveDate) -> StockTransaction {
        StockTransaction {
            id,
            product_id: self.product_id,
            increase: self.increase,
            decrease: self.decrease,
            created_at: self.created_at.unwrap_or(date),
        }
    }
}

/// A transaction row joined with its product's name.
///
/// `product_name` is `None` for orphaned transactions whose product was
/// deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TransactionDetails {
    pub id: i64,
    pub product_id: i64,
    pub increase: i64,
    pub decrease: i64,
    #[ts(as = "String")]
    pub created_at: NaiveDate,
    pub product_name: Option<String>,
}

// =============================================================================
// Delete Outcome
// =============================================================================

/// Result of a delete-by-id.
///
/// `success` is always `true` once the statement ran; `rows_affected` is 0
/// when the id did not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DeleteOutcome {
    pub success: bool,
    pub rows_affected: u64,
}

impl DeleteOutcome {
    pub fn new(rows_affected: u64) -> Self {
        DeleteOutcome {
            success: true,
            rows_affected,
        }
    }

    /// True when the delete actually removed a row.
    pub fn removed(&self) -> bool {
        self.rows_affected > 0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, crate::DATE_FORMAT).unwrap()
    }

    fn product_expiring(expiry: Option<&str>) -> Product {
        NewProduct {
            name: "Milk".to_string(),
            expiry_date: expiry.map(day),
            ..Default::default()
        }
        .with_id(1)
    }

    #[test]
    fn test_expiring_soon_window() {
        let today = day("2024-03-01");

        assert!(product_expiring(Some("2024-03-20")).is_expiring_soon(today, 30));
        assert!(product_expiring(Some("2024-03-30")).is_expiring_soon(today, 30));
        assert!(!product_expiring(Some("2024-03-31")).is_expiring_soon(today, 30));
        assert!(!product_expiring(Some("2025-01-01")).is_expiring_soon(today, 30));
    }

    #[test]
    fn test_expired_counts_as_expiring() {
        let today = day("2024-03-01");
        assert!(product_expiring(Some("2024-02-01")).is_expiring_soon(today, 30));
    }

    #[test]
    fn test_no_expiry_never_expiring() {
        assert!(!product_expiring(None).is_expiring_soon(day("2024-03-01"), 30));
    }

    #[test]
    fn test_new_transaction_echo_uses_default_date() {
        let txn = NewTransaction::increase(7, 12).with_id(3, day("2024-05-05"));
        assert_eq!(txn.id, 3);
        assert_eq!(txn.product_id, 7);
        assert_eq!(txn.increase, 12);
        assert_eq!(txn.decrease, 0);
        assert_eq!(txn.created_at, day("2024-05-05"));

        let pinned = NewTransaction::decrease(7, 4)
            .on(day("2024-01-02"))
            .with_id(4, day("2024-05-05"));
        assert_eq!(pinned.created_at, day("2024-01-02"));
    }

    #[test]
    fn test_user_echo_has_no_password() {
        let input = NewUser {
            username: "amal".to_string(),
            password: "secret".to_string(),
            role: "admin".to_string(),
        };
        let json = serde_json::to_value(input.with_id(5)).unwrap();
        assert_eq!(json["id"], 5);
        assert_eq!(json["username"], "amal");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_product_with_balance_serializes_flat_camel_case() {
        let row = ProductWithBalance {
            product: ProductDetails {
                id: 1,
                name: "Rice".to_string(),
                store_id: None,
                unit_id: Some(2),
                created_date: Some(day("2024-01-01")),
                expiry_date: None,
                description: None,
                store_name: None,
                unit_name: Some("kg".to_string()),
            },
            balance: 90,
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["name"], "Rice");
        assert_eq!(json["unitName"], "kg");
        assert_eq!(json["createdDate"], "2024-01-01");
        assert!(json["storeName"].is_null());
        assert_eq!(json["balance"], 90);
    }

    #[test]
    fn test_delete_outcome_always_success() {
        let none = DeleteOutcome::new(0);
        assert!(none.success);
        assert!(!none.removed());
        assert!(DeleteOutcome::new(1).removed());
    }
}
