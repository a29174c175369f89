//! # Product Commands
//!
//! Product CRUD and the stock listing screen.
//!
//! ## Listing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    list_products(as_of)                                 │
//! │                                                                         │
//! │  as_of: "2024-01" ──► parse_as_of ──► 2024-01-01                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ledger().products_with_balances(as_of)                                │
//! │       │   products LEFT JOIN stores/units                              │
//! │       │   + one balance task per product                               │
//! │       ▼                                                                 │
//! │  ProductView { ...product, storeName, unitName, balance,               │
//! │                expiringSoon }                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use super::parse_as_of;
use crate::error::ApiError;
use crate::state::DbState;
use stockbook_core::{CoreError, DeleteOutcome, NewProduct, Product, ProductDetails, ProductWithBalance};

/// A row of the product listing.
///
/// Serializes flat: product columns, joined names, `balance` and
/// `expiringSoon` side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: ProductDetails,
    pub balance: i64,
    /// Expiry date is within the configured warning window (or past).
    pub expiring_soon: bool,
}

impl ProductView {
    fn new(row: ProductWithBalance, today: NaiveDate, window_days: i64) -> Self {
        let expiring_soon = row.product.is_expiring_soon(today, window_days);
        ProductView {
            product: row.product,
            balance: row.balance,
            expiring_soon,
        }
    }
}

/// Lists every product with its balance, bounded by `as_of` when given.
///
/// ## Arguments
/// * `as_of` - Date, date-time or partial date; `None` means all history
pub async fn list_products(db: &DbState, as_of: Option<String>) -> Result<Vec<ProductView>, ApiError> {
    let as_of = parse_as_of(as_of.as_deref())?;
    debug!(?as_of, "list_products command");

    let rows = db.inner().ledger().products_with_balances(as_of).await?;
    let today = Local::now().date_naive();
    let window = db.expiry_warning_days();

    Ok(rows
        .into_iter()
        .map(|row| ProductView::new(row, today, window))
        .collect())
}

/// Gets one product with its store and unit names.
///
/// ## Returns
/// * `Ok(ProductDetails)` - Product found
/// * `Err(ApiError)` with code `NOT_FOUND` - no such id
pub async fn get_product(db: &DbState, id: i64) -> Result<ProductDetails, ApiError> {
    debug!(id, "get_product command");

    let product = db
        .inner()
        .products()
        .get_by_id(id)
        .await?
        .ok_or(CoreError::ProductNotFound(id))?;

    Ok(product)
}

pub async fn create_product(db: &DbState, input: NewProduct) -> Result<Product, ApiError> {
    debug!(name = %input.name, "create_product command");
    let product = db.inner().products().create(&input).await?;
    info!(id = product.id, name = %product.name, "Product created");
    Ok(product)
}

pub async fn update_product(db: &DbState, id: i64, input: NewProduct) -> Result<Product, ApiError> {
    debug!(id, "update_product command");
    Ok(db.inner().products().update(id, &input).await?)
}

/// Deletes a product. Its transactions are kept.
pub async fn delete_product(db: &DbState, id: i64) -> Result<DeleteOutcome, ApiError> {
    debug!(id, "delete_product command");
    Ok(db.inner().products().delete(id).await?)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::state;
    use crate::error::ErrorCode;
    use chrono::Duration;
    use stockbook_core::{NewStore, NewTransaction};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_listing_with_balance_and_expiry_flag() {
        let db = state().await;
        let today = Local::now().date_naive();

        let store = db
            .inner()
            .stores()
            .create(&NewStore {
                name: "Cold Room".to_string(),
                description: String::new(),
            })
            .await
            .unwrap();
        let milk = create_product(
            &db,
            NewProduct {
                name: "Milk".to_string(),
                store_id: Some(store.id),
                expiry_date: Some(today + Duration::days(3)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let rice = create_product(
            &db,
            NewProduct {
                name: "Rice".to_string(),
                expiry_date: Some(today + Duration::days(365)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let txns = db.inner().transactions();
        txns.create(&NewTransaction::increase(rice.id, 100).on(day(2024, 1, 1))).await.unwrap();
        txns.create(&NewTransaction::decrease(rice.id, 30).on(day(2024, 1, 15))).await.unwrap();
        txns.create(&NewTransaction::increase(rice.id, 20).on(day(2024, 2, 1))).await.unwrap();

        let listed = list_products(&db, None).await.unwrap();
        assert_eq!(listed.len(), 2);

        assert_eq!(listed[0].product.id, milk.id);
        assert_eq!(listed[0].product.store_name.as_deref(), Some("Cold Room"));
        assert_eq!(listed[0].balance, 0);
        assert!(listed[0].expiring_soon);

        assert_eq!(listed[1].product.id, rice.id);
        assert_eq!(listed[1].product.store_name, None);
        assert_eq!(listed[1].balance, 90);
        assert!(!listed[1].expiring_soon);

        let january = list_products(&db, Some("2024-01-31T12:00:00Z".to_string()))
            .await
            .unwrap();
        assert_eq!(january[1].balance, 70);
    }

    #[test]
    fn test_view_serializes_flat() {
        let view = ProductView {
            product: ProductDetails {
                id: 1,
                name: "Rice".to_string(),
                store_id: None,
                unit_id: None,
                created_date: None,
                expiry_date: None,
                description: None,
                store_name: None,
                unit_name: None,
            },
            balance: 90,
            expiring_soon: false,
        };

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["name"], "Rice");
        assert_eq!(json["balance"], 90);
        assert_eq!(json["expiringSoon"], false);
        assert!(json["storeName"].is_null());
    }

    #[tokio::test]
    async fn test_get_missing_product_is_not_found() {
        let db = state().await;
        let err = get_product(&db, 5).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_bad_as_of_rejected() {
        let db = state().await;
        let err = list_products(&db, Some("31/01/2024".to_string())).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_dangling_unit_is_invalid_reference() {
        let db = state().await;
        let err = create_product(
            &db,
            NewProduct {
                name: "Tea".to_string(),
                unit_id: Some(12),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidReference);
    }
}
