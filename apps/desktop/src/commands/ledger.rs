//! # Ledger Commands
//!
//! Single-product stock figures for the product detail screen.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use super::parse_as_of;
use crate::error::ApiError;
use crate::state::DbState;

/// Stock figures for one product up to (and including) a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BalanceView {
    pub product_id: i64,
    /// Normalized bound; `None` when the whole history was counted.
    #[ts(as = "Option<String>")]
    pub as_of: Option<NaiveDate>,
    pub increase: i64,
    pub decrease: i64,
    pub balance: i64,
}

/// Computes one product's totals and balance.
///
/// Works for deleted products too, as long as their transactions remain.
/// A product with no history has balance 0.
pub async fn product_balance(
    db: &DbState,
    product_id: i64,
    as_of: Option<String>,
) -> Result<BalanceView, ApiError> {
    let as_of = parse_as_of(as_of.as_deref())?;
    debug!(product_id, ?as_of, "product_balance command");

    let totals = db.inner().ledger().totals(product_id, as_of).await?;

    Ok(BalanceView {
        product_id,
        as_of,
        increase: totals.increase,
        decrease: totals.decrease,
        balance: totals.balance(),
    })
}

/// First day with any recorded movement, for one product or overall.
pub async fn earliest_activity(db: &DbState, product_id: Option<i64>) -> Result<Option<NaiveDate>, ApiError> {
    debug!(?product_id, "earliest_activity command");
    Ok(db.inner().ledger().earliest_activity(product_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::state;
    use crate::commands::transaction::create_transaction;
    use stockbook_core::NewTransaction;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_rice_balance_as_of_end_of_january() {
        let db = state().await;
        let rice = db
            .inner()
            .products()
            .create(&stockbook_core::NewProduct {
                name: "Rice".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        create_transaction(&db, NewTransaction::increase(rice.id, 100).on(day(2024, 1, 1))).await.unwrap();
        create_transaction(&db, NewTransaction::decrease(rice.id, 30).on(day(2024, 1, 15))).await.unwrap();
        create_transaction(&db, NewTransaction::increase(rice.id, 20).on(day(2024, 2, 1))).await.unwrap();

        let january = product_balance(&db, rice.id, Some("2024-01-31T09:30:00Z".to_string()))
            .await
            .unwrap();
        assert_eq!(
            january,
            BalanceView {
                product_id: rice.id,
                as_of: Some(day(2024, 1, 31)),
                increase: 100,
                decrease: 30,
                balance: 70,
            }
        );

        let all = product_balance(&db, rice.id, None).await.unwrap();
        assert_eq!(all.balance, 90);
        assert_eq!(all.as_of, None);

        assert_eq!(earliest_activity(&db, Some(rice.id)).await.unwrap(), Some(day(2024, 1, 1)));
    }

    #[tokio::test]
    async fn test_empty_history() {
        let db = state().await;

        let view = product_balance(&db, 77, None).await.unwrap();
        assert_eq!(view.balance, 0);
        assert_eq!(earliest_activity(&db, None).await.unwrap(), None);
    }

    #[test]
    fn test_balance_view_json() {
        let view = BalanceView {
            product_id: 1,
            as_of: Some(day(2024, 1, 31)),
            increase: 100,
            decrease: 30,
            balance: 70,
        };

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["productId"], 1);
        assert_eq!(json["asOf"], "2024-01-31");
    }
}
