//! # Transaction Commands
//!
//! Ledger rows: the history screen and stock in/out entry.
//!
//! Listing is newest first. A row whose product was deleted stays in the
//! listing with `productName: null`.

use tracing::{debug, info};

use super::parse_as_of;
use crate::error::ApiError;
use crate::state::DbState;
use stockbook_core::{DeleteOutcome, NewTransaction, StockTransaction, TransactionDetails};
use stockbook_db::TransactionFilter;

/// Lists transactions, optionally for one product and up to a day.
///
/// ## Arguments
/// * `product_id` - Restrict to one product (deleted products included)
/// * `as_of` - Date, date-time or partial date; inclusive upper bound
pub async fn list_transactions(
    db: &DbState,
    product_id: Option<i64>,
    as_of: Option<String>,
) -> Result<Vec<TransactionDetails>, ApiError> {
    let as_of = parse_as_of(as_of.as_deref())?;
    debug!(?product_id, ?as_of, "list_transactions command");

    let filter = TransactionFilter { product_id, as_of };
    Ok(db.inner().transactions().list(&filter).await?)
}

pub async fn get_transaction(db: &DbState, id: i64) -> Result<StockTransaction, ApiError> {
    debug!(id, "get_transaction command");
    db.inner()
        .transactions()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Transaction", id))
}

/// Records stock moving in or out. `createdAt` defaults to today.
pub async fn create_transaction(db: &DbState, input: NewTransaction) -> Result<StockTransaction, ApiError> {
    debug!(product_id = input.product_id, "create_transaction command");
    let txn = db.inner().transactions().create(&input).await?;
    info!(
        id = txn.id,
        product_id = txn.product_id,
        increase = txn.increase,
        decrease = txn.decrease,
        "Transaction recorded"
    );
    Ok(txn)
}

/// Replaces a transaction. Without `createdAt` the stored day is kept.
pub async fn update_transaction(
    db: &DbState,
    id: i64,
    input: NewTransaction,
) -> Result<StockTransaction, ApiError> {
    debug!(id, "update_transaction command");
    Ok(db.inner().transactions().update(id, &input).await?)
}

pub async fn delete_transaction(db: &DbState, id: i64) -> Result<DeleteOutcome, ApiError> {
    debug!(id, "delete_transaction command");
    Ok(db.inner().transactions().delete(id).await?)
}
