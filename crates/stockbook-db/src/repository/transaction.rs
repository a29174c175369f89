//! # Transaction Repository
//!
//! Database operations for stock transactions (the ledger rows).
//!
//! ## Ledger Rows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    transactions                                         │
//! │                                                                         │
//! │   id │ product_id │ increase │ decrease │ created_at                    │
//! │  ────┼────────────┼──────────┼──────────┼────────────                   │
//! │    1 │     1      │   100    │    0     │ 2024-01-01                    │
//! │    2 │     1      │    0     │   30     │ 2024-01-15                    │
//! │    3 │     1      │   20     │    0     │ 2024-02-01                    │
//! │                                                                         │
//! │  Rows are never netted in place; balances are always derived by        │
//! │  summing (see crate::ledger).                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Local, NaiveDate};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult, LogFailure};
use crate::ledger::TransactionSource;
use crate::query::{transactions_query, TransactionFilter};
use crate::repository::product::ProductRepository;
use stockbook_core::validation::{validate_id, validate_new_transaction};
use stockbook_core::{DeleteOutcome, NewTransaction, StockTransaction, TransactionDetails};

/// Repository for stock transaction operations.
///
/// ## Usage
/// ```rust,ignore
/// let txns = db.transactions();
/// txns.create(&NewTransaction::increase(rice.id, 100)).await?;
///
/// let history = txns.list(&TransactionFilter::for_product(rice.id)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Lists transactions matching `filter`, newest first, each with its
    /// product's name (None for orphans).
    pub async fn list(&self, filter: &TransactionFilter) -> DbResult<Vec<TransactionDetails>> {
        debug!(
            product_id = ?filter.product_id,
            as_of = ?filter.as_of,
            "Listing transactions"
        );

        let rows = transactions_query(filter)
            .build_query_as::<TransactionDetails>()
            .fetch_all(&self.pool)
            .await
            .log_failure("list_transactions")?;

        debug!(count = rows.len(), "Listed transactions");
        Ok(rows)
    }

    /// Gets a transaction by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<StockTransaction>> {
        debug!(id, "Getting transaction");

        let txn = sqlx::query_as::<_, StockTransaction>(
            r#"
            SELECT
                id,
                product_id,
                COALESCE(increase, 0) AS increase,
                COALESCE(decrease, 0) AS decrease,
                created_at
            FROM transactions
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .log_failure("get_transaction")?;

        Ok(txn)
    }

    /// Records a stock movement.
    ///
    /// Without an explicit `created_at` the row is stamped with today's
    /// local date.
    ///
    /// ## Errors
    /// * `DbError::Validation` - negative quantity, bad product_id
    /// * `DbError::ForeignKeyViolation` - product does not exist
    pub async fn create(&self, txn: &NewTransaction) -> DbResult<StockTransaction> {
        validate_new_transaction(txn)?;
        self.check_product(txn.product_id).await?;

        let created_at = txn.created_at.unwrap_or_else(today);
        debug!(
            product_id = txn.product_id,
            increase = txn.increase,
            decrease = txn.decrease,
            %created_at,
            "Creating transaction"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO transactions (product_id, increase, decrease, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(txn.product_id)
        .bind(txn.increase)
        .bind(txn.decrease)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .log_failure("create_transaction")?;

        Ok(txn.with_id(result.last_insert_rowid(), created_at))
    }

    /// Replaces product_id, increase, decrease and created_at of a row.
    ///
    /// A missing `created_at` keeps the stored day, so a quantity correction
    /// does not move the row in time. Reports success even when no row has
    /// this id; the echo then carries the given day, or today.
    pub async fn update(&self, id: i64, txn: &NewTransaction) -> DbResult<StockTransaction> {
        validate_id("id", id)?;
        validate_new_transaction(txn)?;
        self.check_product(txn.product_id).await?;

        debug!(id, product_id = txn.product_id, created_at = ?txn.created_at, "Updating transaction");

        let stored_day: Option<NaiveDate> = sqlx::query_scalar(
            r#"
            UPDATE transactions SET
                product_id = ?1,
                increase = ?2,
                decrease = ?3,
                created_at = COALESCE(?4, created_at)
            WHERE id = ?5
            RETURNING created_at
            "#,
        )
        .bind(txn.product_id)
        .bind(txn.increase)
        .bind(txn.decrease)
        .bind(txn.created_at)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .log_failure("update_transaction")?;

        let created_at = match stored_day {
            Some(day) => day,
            None => {
                debug!(id, "Update matched no transaction");
                txn.created_at.unwrap_or_else(today)
            }
        };

        Ok(txn.with_id(id, created_at))
    }

    /// Deletes a transaction by id.
    pub async fn delete(&self, id: i64) -> DbResult<DeleteOutcome> {
        debug!(id, "Deleting transaction");

        let result = sqlx::query("DELETE FROM transactions WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .log_failure("delete_transaction")?;

        Ok(DeleteOutcome::new(result.rows_affected()))
    }

    /// Counts transactions.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await
            .log_failure("count_transactions")?;

        Ok(count)
    }

    async fn check_product(&self, product_id: i64) -> DbResult<()> {
        if ProductRepository::new(self.pool.clone()).exists(product_id).await? {
            Ok(())
        } else {
            Err(DbError::dangling("product_id", product_id))
        }
    }
}

impl TransactionSource for TransactionRepository {
    async fn transactions(&self, filter: TransactionFilter) -> DbResult<Vec<TransactionDetails>> {
        self.list(&filter).await
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use stockbook_core::NewProduct;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn with_product(name: &str) -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .create(&NewProduct {
                name: name.to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        (db, product.id)
    }

    #[tokio::test]
    async fn test_create_then_get_by_id() {
        let (db, rice) = with_product("Rice").await;
        let input = NewTransaction::increase(rice, 100).on(day(2024, 1, 1));

        let created = db.transactions().create(&input).await.unwrap();
        assert_eq!(created, input.with_id(created.id, day(2024, 1, 1)));
        assert_eq!(
            db.transactions().get_by_id(created.id).await.unwrap(),
            Some(created)
        );
    }

    #[tokio::test]
    async fn test_create_defaults_to_today() {
        let (db, rice) = with_product("Rice").await;
        let created = db
            .transactions()
            .create(&NewTransaction::decrease(rice, 5))
            .await
            .unwrap();

        assert_eq!(created.created_at, today());
    }

    #[tokio::test]
    async fn test_unknown_product_rejected() {
        let (db, rice) = with_product("Rice").await;
        let err = db
            .transactions()
            .create(&NewTransaction::increase(rice + 1, 1))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert_eq!(db.transactions().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_negative_quantity_rejected() {
        let (db, rice) = with_product("Rice").await;
        let err = db
            .transactions()
            .create(&NewTransaction::decrease(rice, -3))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_filters_and_orders() {
        let (db, rice) = with_product("Rice").await;
        let flour = db
            .products()
            .create(&NewProduct {
                name: "Flour".to_string(),
                ..Default::default()
            })
            .await
            .unwrap()
            .id;
        let txns = db.transactions();

        txns.create(&NewTransaction::increase(rice, 100).on(day(2024, 1, 1))).await.unwrap();
        txns.create(&NewTransaction::decrease(rice, 30).on(day(2024, 1, 15))).await.unwrap();
        txns.create(&NewTransaction::increase(rice, 20).on(day(2024, 2, 1))).await.unwrap();
        txns.create(&NewTransaction::increase(flour, 7).on(day(2024, 1, 10))).await.unwrap();

        let all = txns.list(&TransactionFilter::all()).await.unwrap();
        assert_eq!(all.len(), 4);
        let dates: Vec<_> = all.iter().map(|t| t.created_at).collect();
        assert_eq!(
            dates,
            vec![day(2024, 2, 1), day(2024, 1, 15), day(2024, 1, 10), day(2024, 1, 1)]
        );

        let rice_rows = txns.list(&TransactionFilter::for_product(rice)).await.unwrap();
        assert_eq!(rice_rows.len(), 3);
        assert!(rice_rows.iter().all(|t| t.product_name.as_deref() == Some("Rice")));

        let january = txns
            .list(&TransactionFilter::for_product(rice).as_of(Some(day(2024, 1, 31))))
            .await
            .unwrap();
        assert_eq!(january.len(), 2);

        let everything_by_jan_10 = txns
            .list(&TransactionFilter::all().as_of(Some(day(2024, 1, 10))))
            .await
            .unwrap();
        assert_eq!(everything_by_jan_10.len(), 2);
    }

    #[tokio::test]
    async fn test_same_day_ties_break_by_id_desc() {
        let (db, rice) = with_product("Rice").await;
        let first = db
            .transactions()
            .create(&NewTransaction::increase(rice, 1).on(day(2024, 3, 3)))
            .await
            .unwrap();
        let second = db
            .transactions()
            .create(&NewTransaction::increase(rice, 2).on(day(2024, 3, 3)))
            .await
            .unwrap();

        let rows = db.transactions().list(&TransactionFilter::all()).await.unwrap();
        let ids: Vec<_> = rows.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_update_is_full_row_replace() {
        let (db, rice) = with_product("Rice").await;
        let created = db
            .transactions()
            .create(&NewTransaction::increase(rice, 100).on(day(2024, 1, 1)))
            .await
            .unwrap();

        let replacement = NewTransaction::decrease(rice, 40).on(day(2024, 1, 20));
        let updated = db.transactions().update(created.id, &replacement).await.unwrap();

        let fetched = db.transactions().get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, updated);
        assert_eq!(fetched.increase, 0);
        assert_eq!(fetched.decrease, 40);
        assert_eq!(fetched.created_at, day(2024, 1, 20));
    }

    #[tokio::test]
    async fn test_quantity_only_update_keeps_day() {
        let (db, rice) = with_product("Rice").await;
        let created = db
            .transactions()
            .create(&NewTransaction::increase(rice, 100).on(day(2024, 1, 1)))
            .await
            .unwrap();

        let updated = db
            .transactions()
            .update(created.id, &NewTransaction::increase(rice, 120))
            .await
            .unwrap();
        assert_eq!(updated.created_at, day(2024, 1, 1));

        let fetched = db.transactions().get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, updated);
        assert_eq!(db.ledger().balance(rice, Some(day(2024, 1, 31))).await.unwrap(), 120);
    }

    #[tokio::test]
    async fn test_update_missing_echoes_today() {
        let (db, rice) = with_product("Rice").await;
        let echoed = db
            .transactions()
            .update(77, &NewTransaction::decrease(rice, 3))
            .await
            .unwrap();

        assert_eq!(echoed.created_at, today());
        assert_eq!(db.transactions().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_oversized_quantity_rejected() {
        let (db, rice) = with_product("Rice").await;
        let err = db
            .transactions()
            .create(&NewTransaction::increase(rice, i64::MAX))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Validation(_)));
        assert_eq!(db.transactions().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_missing_is_success() {
        let (db, _) = with_product("Rice").await;
        let outcome = db.transactions().delete(404).await.unwrap();
        assert!(outcome.success);
        assert!(!outcome.removed());
    }
}
