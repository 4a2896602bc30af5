//! Best-effort batch results.
//!
//! Batch operations never stop at the first failing item. Instead every item gets
//! an `ItemOutcome` and the caller decides how to present successes and failures.
use crate::error::StockError;
use crate::result::Result;

/// Outcome of one item in a batch.
#[derive(Debug)]
pub struct ItemOutcome<T> {
    /// Item as the caller supplied it.
    pub item: String,
    /// Success value or the failure for this item only.
    pub outcome: Result<T>,
}

impl<T> ItemOutcome<T> {
    /// Whether this item succeeded.
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Per-item outcomes of a batch, in input order.
#[derive(Debug)]
pub struct BatchReport<T> {
    items: Vec<ItemOutcome<T>>,
}

impl<T> BatchReport<T> {
    /// Empty report.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Records the outcome for `item`.
    pub fn push(&mut self, item: impl Into<String>, outcome: Result<T>) {
        self.items.push(ItemOutcome {
            item: item.into(),
            outcome,
        });
    }

    /// All outcomes, in input order.
    pub fn items(&self) -> &[ItemOutcome<T>] {
        &self.items
    }

    /// Number of items in the batch.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the batch had no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Successful values, in input order.
    pub fn successes(&self) -> impl Iterator<Item = &T> {
        self.items.iter().filter_map(|i| i.outcome.as_ref().ok())
    }

    /// Failed items with their error, in input order.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &StockError)> {
        self.items
            .iter()
            .filter_map(|i| i.outcome.as_ref().err().map(|e| (i.item.as_str(), e)))
    }

    /// Whether every item succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.items.iter().all(ItemOutcome::is_ok)
    }

    /// Consumes the report, keeping only the successful values.
    pub fn into_successes(self) -> Vec<T> {
        self.items
            .into_iter()
            .filter_map(|i| i.outcome.ok())
            .collect()
    }
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self::new()
    }
}
