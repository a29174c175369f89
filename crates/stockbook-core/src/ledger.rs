//! # Stock Ledger
//!
//! Pure balance computation over a product's transaction history.
//!
//! ## Balance Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     balance(P, as_of)                                   │
//! │                                                                         │
//! │  history of P:   2024-01-01  +100                                      │
//! │                  2024-01-15         -30                                 │
//! │                  2024-02-01  +20                                        │
//! │                                                                         │
//! │  as_of = 2024-01-31 ──► Σ+ = 100, Σ- = 30 ──► 70                        │
//! │  as_of = None       ──► Σ+ = 120, Σ- = 30 ──► 90                        │
//! │                                                                         │
//! │  The as-of bound is inclusive: an entry dated exactly as_of counts.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The database layer usually applies the date bound in SQL and hands the
//! already-filtered rows to [`balance`]; [`balance_as_of`] applies the same
//! bound in memory.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{StockTransaction, TransactionDetails};

/// Anything that can be reduced into a balance.
pub trait LedgerEntry {
    fn increase(&self) -> i64;
    fn decrease(&self) -> i64;
    fn date(&self) -> NaiveDate;
}

impl LedgerEntry for StockTransaction {
    fn increase(&self) -> i64 {
        self.increase
    }

    fn decrease(&self) -> i64 {
        self.decrease
    }

    fn date(&self) -> NaiveDate {
        self.created_at
    }
}

impl LedgerEntry for TransactionDetails {
    fn increase(&self) -> i64 {
        self.increase
    }

    fn decrease(&self) -> i64 {
        self.decrease
    }

    fn date(&self) -> NaiveDate {
        self.created_at
    }
}

/// Summed movements for one product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LedgerTotals {
    pub increase: i64,
    pub decrease: i64,
}

impl LedgerTotals {
    /// Net stock: total in minus total out.
    #[inline]
    pub fn balance(&self) -> i64 {
        self.increase.saturating_sub(self.decrease)
    }

    // Sums clamp at i64::MAX; rows written outside the repositories are not
    // bounded by MAX_QUANTITY.
    fn accumulate<E: LedgerEntry>(mut self, entry: &E) -> Self {
        self.increase = self.increase.saturating_add(entry.increase());
        self.decrease = self.decrease.saturating_add(entry.decrease());
        self
    }
}

/// Sums increases and decreases over every entry.
pub fn totals<E: LedgerEntry>(entries: &[E]) -> LedgerTotals {
    entries.iter().fold(LedgerTotals::default(), LedgerTotals::accumulate)
}

/// Sums entries dated on or before `as_of` (all entries when `None`).
pub fn totals_as_of<E: LedgerEntry>(entries: &[E], as_of: Option<NaiveDate>) -> LedgerTotals {
    entries
        .iter()
        .filter(|entry| within(entry.date(), as_of))
        .fold(LedgerTotals::default(), LedgerTotals::accumulate)
}

/// Σincrease − Σdecrease over every entry.
pub fn balance<E: LedgerEntry>(entries: &[E]) -> i64 {
    totals(entries).balance()
}

/// Σincrease − Σdecrease over entries dated on or before `as_of`.
pub fn balance_as_of<E: LedgerEntry>(entries: &[E], as_of: Option<NaiveDate>) -> i64 {
    totals_as_of(entries, as_of).balance()
}

/// First calendar day with any activity, or `None` for an empty history.
pub fn earliest_date<E: LedgerEntry>(entries: &[E]) -> Option<NaiveDate> {
    entries.iter().map(LedgerEntry::date).min()
}

#[inline]
fn within(date: NaiveDate, as_of: Option<NaiveDate>) -> bool {
    as_of.map_or(true, |bound| date <= bound)
}

// =============================================================================
// Unit Tests
// =============================================================================
