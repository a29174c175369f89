//! # Ledger Aggregator
//!
//! Fetches transaction history and reduces it to stock balances.
//!
//! ## Bulk Balances
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 products_with_balances(as_of)                           │
//! │                                                                         │
//! │  products.list()                                                       │
//! │       │                                                                 │
//! │       ▼  one tokio task per product                                    │
//! │  ┌──────────┐ ┌──────────┐ ┌──────────┐                                │
//! │  │ Rice     │ │ Flour    │ │ Sugar    │   source.transactions(filter)  │
//! │  │ Σ+ − Σ−  │ │ Σ+ − Σ−  │ │  Err!    │   → ledger::balance_as_of      │
//! │  └────┬─────┘ └────┬─────┘ └────┬─────┘                                │
//! │       │            │            │  error! logged, balance = 0          │
//! │       ▼            ▼            ▼                                       │
//! │  joined in product order:                                              │
//! │  [Rice: 90, Flour: 12, Sugar: 0]                                       │
//! │                                                                         │
//! │  Nothing is cached; every call re-reads the ledger.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;

use chrono::NaiveDate;
use tracing::{debug, error};

use crate::error::{DbError, DbResult};
use crate::query::TransactionFilter;
use crate::repository::product::ProductRepository;
use stockbook_core::ledger;
use stockbook_core::{LedgerTotals, ProductDetails, ProductWithBalance, TransactionDetails};

// =============================================================================
// Transaction Source
// =============================================================================

/// Anything that can list transaction rows for a filter.
///
/// Balance tasks each hold their own clone, so implementors must be cheap to
/// clone and safe to move across threads.
pub trait TransactionSource: Clone + Send + Sync + 'static {
    fn transactions(
        &self,
        filter: TransactionFilter,
    ) -> impl Future<Output = DbResult<Vec<TransactionDetails>>> + Send;
}

// =============================================================================
// Ledger
// =============================================================================

/// Stateless balance service over a product repository and a transaction
/// source.
///
/// ## Usage
/// ```rust,ignore
/// let ledger = db.ledger();
/// let on_hand = ledger.balance(rice.id, None).await?;
/// let listing = ledger.products_with_balances(Some(jan_31)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Ledger<S> {
    products: ProductRepository,
    transactions: S,
}

impl<S: TransactionSource> Ledger<S> {
    pub fn new(products: ProductRepository, transactions: S) -> Self {
        Ledger {
            products,
            transactions,
        }
    }

    /// Σincrease and Σdecrease for one product, bounded by `as_of`
    /// (inclusive) when given.
    pub async fn totals(&self, product_id: i64, as_of: Option<NaiveDate>) -> DbResult<LedgerTotals> {
        let filter = TransactionFilter::for_product(product_id).as_of(as_of);
        let rows = self.transactions.transactions(filter).await?;

        Ok(ledger::totals_as_of(&rows, as_of))
    }

    /// Current stock of one product: Σincrease − Σdecrease.
    ///
    /// A product with no transactions (or no such product) has balance 0.
    pub async fn balance(&self, product_id: i64, as_of: Option<NaiveDate>) -> DbResult<i64> {
        let balance = self.totals(product_id, as_of).await?.balance();
        debug!(product_id, ?as_of, balance, "Computed balance");
        Ok(balance)
    }

    /// Every product with its balance, in listing order.
    ///
    /// Only the product listing itself can fail; a failing balance is logged
    /// and reported as 0.
    pub async fn products_with_balances(
        &self,
        as_of: Option<NaiveDate>,
    ) -> DbResult<Vec<ProductWithBalance>> {
        let products = self.products.list().await?;
        Ok(attach_balances(&self.transactions, products, as_of).await)
    }

    /// First day with any activity, optionally for a single product.
    pub async fn earliest_activity(&self, product_id: Option<i64>) -> DbResult<Option<NaiveDate>> {
        let filter = TransactionFilter {
            product_id,
            as_of: None,
        };
        let rows = self.transactions.transactions(filter).await?;

        Ok(ledger::earliest_date(&rows))
    }
}

/// Computes each product's balance in its own task and pairs the results
/// back up with the products, preserving order.
///
/// A task that errors or panics yields balance 0 for its product only.
pub async fn attach_balances<S: TransactionSource>(
    source: &S,
    products: Vec<ProductDetails>,
    as_of: Option<NaiveDate>,
) -> Vec<ProductWithBalance> {
    debug!(products = products.len(), ?as_of, "Spawning balance tasks");

    let handles: Vec<_> = products
        .iter()
        .map(|product| {
            let source = source.clone();
            let filter = TransactionFilter::for_product(product.id).as_of(as_of);

            tokio::spawn(async move {
                let rows = source.transactions(filter).await?;
                Ok::<i64, DbError>(ledger::balance_as_of(&rows, as_of))
            })
        })
        .collect();

    let mut listed = Vec::with_capacity(products.len());

    for (product, handle) in products.into_iter().zip(handles) {
        let balance = match handle.await {
            Ok(Ok(balance)) => balance,
            Ok(Err(err)) => {
                error!(product_id = product.id, error = %err, "Balance query failed, reporting 0");
                0
            }
            Err(err) => {
                error!(product_id = product.id, error = %err, "Balance task aborted, reporting 0");
                0
            }
        };

        listed.push(ProductWithBalance { product, balance });
    }

    listed
}

// =============================================================================
// Unit Tests
// =============================================================================
