//! # Query Composer
//!
//! Builds the joined, filtered read statements shared by the repositories
//! and the balance aggregator.
//!
//! ## Statement Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Composed Reads                                    │
//! │                                                                         │
//! │  products_query(id?)                                                   │
//! │    products p                                                           │
//! │      LEFT JOIN stores s ON s.id = p.store_id  → store_name             │
//! │      LEFT JOIN units  u ON u.id = p.unit_id   → unit_name              │
//! │    [WHERE p.id = ?]                                                    │
//! │                                                                         │
//! │  transactions_query(filter)                                            │
//! │    transactions t                                                       │
//! │      LEFT JOIN products p ON p.id = t.product_id → product_name        │
//! │    [WHERE t.product_id = ?] [AND t.created_at <= ?]                    │
//! │    ORDER BY t.created_at DESC, t.id DESC                               │
//! │                                                                         │
//! │  Every value goes through push_bind; nothing is interpolated.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! LEFT joins keep rows whose reference is null or dangling: an unassigned
//! product still lists (with `store_name = NULL`), and so does a transaction
//! whose product was deleted.

use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite};

const PRODUCT_COLUMNS: &str = r#"
    SELECT
        p.id           AS id,
        p.name         AS name,
        p.store_id     AS store_id,
        p.unit_id      AS unit_id,
        p.created_date AS created_date,
        p.expiry_date  AS expiry_date,
        p.description  AS description,
        s.name         AS store_name,
        u.name         AS unit_name
    FROM products p
    LEFT JOIN stores s ON s.id = p.store_id
    LEFT JOIN units u ON u.id = p.unit_id
"#;

const TRANSACTION_COLUMNS: &str = r#"
    SELECT
        t.id                     AS id,
        t.product_id             AS product_id,
        COALESCE(t.increase, 0)  AS increase,
        COALESCE(t.decrease, 0)  AS decrease,
        t.created_at             AS created_at,
        p.name                   AS product_name
    FROM transactions t
    LEFT JOIN products p ON p.id = t.product_id
"#;

// =============================================================================
// Filters
// =============================================================================

/// Optional predicates for a transaction listing.
///
/// Both `None` lists every transaction.
///
/// ## Example
/// ```rust,ignore
/// let filter = TransactionFilter::for_product(rice.id).as_of(jan_31);
/// let rows = db.transactions().list(&filter).await?;
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub product_id: Option<i64>,
    /// Inclusive upper bound on `created_at`.
    pub as_of: Option<NaiveDate>,
}

impl TransactionFilter {
    /// No predicates.
    pub fn all() -> Self {
        TransactionFilter::default()
    }

    /// Restricts the listing to one product.
    pub fn for_product(product_id: i64) -> Self {
        TransactionFilter {
            product_id: Some(product_id),
            as_of: None,
        }
    }

    /// Sets (or clears) the as-of bound.
    pub fn as_of(mut self, as_of: Option<NaiveDate>) -> Self {
        self.as_of = as_of;
        self
    }
}

// =============================================================================
// Builders
// =============================================================================

/// Product listing joined with store and unit names, optionally narrowed to
/// one id.
///
/// Rows come back in insertion order (by id).
pub fn products_query(id: Option<i64>) -> QueryBuilder<'static, Sqlite> {
    let mut builder = QueryBuilder::new(PRODUCT_COLUMNS);

    if let Some(id) = id {
        builder.push(" WHERE p.id = ").push_bind(id);
    }

    builder.push(" ORDER BY p.id");
    builder
}

/// Transaction listing joined with product names.
///
/// Predicates are conjoined with AND; newest first, same-day rows by id
/// descending.
pub fn transactions_query(filter: &TransactionFilter) -> QueryBuilder<'static, Sqlite> {
    let mut builder = QueryBuilder::new(TRANSACTION_COLUMNS);
    let mut keyword = " WHERE ";

    if let Some(product_id) = filter.product_id {
        builder.push(keyword).push("t.product_id = ").push_bind(product_id);
        keyword = " AND ";
    }

    if let Some(as_of) = filter.as_of {
        builder.push(keyword).push("t.created_at <= ").push_bind(as_of);
    }

    builder.push(" ORDER BY t.created_at DESC, t.id DESC");
    builder
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn squash(sql: &str) -> String {
        sql.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_products_query_all() {
        let builder = products_query(None);
        let sql = squash(builder.sql());

        assert!(sql.contains("LEFT JOIN stores s ON s.id = p.store_id"));
        assert!(sql.contains("LEFT JOIN units u ON u.id = p.unit_id"));
        assert!(!sql.contains("WHERE"));
        assert!(sql.ends_with("ORDER BY p.id"));
    }

    #[test]
    fn test_products_query_by_id_binds() {
        let builder = products_query(Some(4));
        let sql = squash(builder.sql());

        assert!(sql.contains("WHERE p.id = ?"));
        assert!(!sql.contains('4'));
    }

    #[test]
    fn test_transactions_query_no_filter() {
        let builder = transactions_query(&TransactionFilter::all());
        let sql = squash(builder.sql());

        assert!(!sql.contains("WHERE"));
        assert!(sql.ends_with("ORDER BY t.created_at DESC, t.id DESC"));
    }

    #[test]
    fn test_transactions_query_product_only() {
        let builder = transactions_query(&TransactionFilter::for_product(1));
        let sql = squash(builder.sql());

        assert!(sql.contains("WHERE t.product_id = ?"));
        assert!(!sql.contains("created_at <="));
    }

    #[test]
    fn test_transactions_query_as_of_only() {
        let as_of = NaiveDate::from_ymd_opt(2024, 1, 31);
        let builder = transactions_query(&TransactionFilter::all().as_of(as_of));
        let sql = squash(builder.sql());

        assert!(sql.contains("WHERE t.created_at <= ?"));
        assert!(!sql.contains("AND"));
    }

    #[test]
    fn test_transactions_query_both_predicates() {
        let as_of = NaiveDate::from_ymd_opt(2024, 1, 31);
        let builder = transactions_query(&TransactionFilter::for_product(1).as_of(as_of));
        let sql = squash(builder.sql());

        assert!(sql.contains("WHERE t.product_id = ? AND t.created_at <= ?"));
        assert!(!sql.contains("2024"));
    }

    #[test]
    fn test_filter_builders() {
        let bound = NaiveDate::from_ymd_opt(2024, 1, 1);
        assert_eq!(TransactionFilter::all(), TransactionFilter::default());
        assert_eq!(TransactionFilter::for_product(2).product_id, Some(2));
        assert_eq!(TransactionFilter::all().as_of(bound).as_of, bound);
    }
}
