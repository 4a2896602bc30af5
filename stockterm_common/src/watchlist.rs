//! Watchlist membership rules and the manager that persists them.
//!
//! The in-memory `Watchlist` is always deduplicated and sorted ascending. The
//! `WatchlistManager` loads it from storage for every operation, applies one
//! change, and writes the full list back only when the change succeeded.
use std::collections::HashSet;

use log::{info, warn};

use crate::batch::BatchReport;
use crate::error::StockError;
use crate::result::Result;
use crate::store::{FileStore, WatchlistStorage};
use crate::tickers::Ticker;

/// Sorted, duplicate-free list of tickers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Watchlist {
    tickers: Vec<Ticker>,
}

impl Watchlist {
    /// Builds a watchlist from arbitrary tickers.
    ///
    /// Duplicates are dropped keeping the first occurrence, then the list is sorted.
    pub fn from_tickers<I: IntoIterator<Item = Ticker>>(tickers: I) -> Self {
        let mut seen = HashSet::new();
        let mut tickers: Vec<Ticker> = tickers
            .into_iter()
            .filter(|t| seen.insert(t.clone()))
            .collect();
        tickers.sort();
        Self { tickers }
    }

    /// Inserts `ticker` at its sorted position.
    pub fn insert(&mut self, ticker: Ticker) -> Result<()> {
        match self.tickers.binary_search(&ticker) {
            Ok(_) => Err(StockError::AlreadyPresent(ticker)),
            Err(position) => {
                self.tickers.insert(position, ticker);
                Ok(())
            }
        }
    }

    /// Removes `ticker`, keeping the remainder in order.
    pub fn remove(&mut self, ticker: &Ticker) -> Result<()> {
        match self.tickers.binary_search(ticker) {
            Ok(position) => {
                self.tickers.remove(position);
                Ok(())
            }
            Err(_) => Err(StockError::NotPresent(ticker.clone())),
        }
    }

    /// Whether `ticker` is a member.
    pub fn contains(&self, ticker: &Ticker) -> bool {
        self.tickers.binary_search(ticker).is_ok()
    }

    /// Members in ascending order.
    pub fn as_slice(&self) -> &[Ticker] {
        &self.tickers
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    /// Whether the watchlist has no members.
    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    /// Members in ascending order.
    pub fn into_vec(self) -> Vec<Ticker> {
        self.tickers
    }
}

/// Read-modify-write operations over a stored watchlist.
pub struct WatchlistManager<S = FileStore> {
    store: S,
}

impl<S: WatchlistStorage> WatchlistManager<S> {
    /// Manager persisting through `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying storage.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current watchlist, normalized, deduplicated and sorted.
    pub fn list(&self) -> Result<Vec<Ticker>> {
        Ok(self.load()?.into_vec())
    }

    /// Adds one ticker and persists the result.
    pub fn add(&self, raw: &str) -> Result<Ticker> {
        let ticker = Ticker::parse(raw)?;
        let mut watchlist = self.load()?;
        watchlist.insert(ticker.clone())?;
        self.store.save(watchlist.as_slice())?;
        info!("Added {} to the watchlist", ticker);
        Ok(ticker)
    }

    /// Removes one ticker and persists the remainder.
    pub fn remove(&self, raw: &str) -> Result<Ticker> {
        let ticker = Ticker::parse(raw)?;
        let mut watchlist = self.load()?;
        watchlist.remove(&ticker)?;
        self.store.save(watchlist.as_slice())?;
        info!("Removed {} from the watchlist", ticker);
        Ok(ticker)
    }

    /// Replaces the whole watchlist.
    ///
    /// Blank entries are dropped and duplicates keep their first occurrence. Returns
    /// the list as stored.
    pub fn replace<R: AsRef<str>>(&self, raws: &[R]) -> Result<Vec<Ticker>> {
        let watchlist =
            Watchlist::from_tickers(raws.iter().filter_map(|raw| Ticker::parse(raw.as_ref()).ok()));
        self.store.save(watchlist.as_slice())?;
        info!("Replaced the watchlist with {} tickers", watchlist.len());
        Ok(watchlist.into_vec())
    }

    /// Adds every entry, continuing past failures.
    pub fn add_many<R: AsRef<str>>(&self, raws: &[R]) -> BatchReport<Ticker> {
        self.apply_each(raws, |raw| self.add(raw))
    }

    /// Removes every entry, continuing past failures.
    pub fn remove_many<R: AsRef<str>>(&self, raws: &[R]) -> BatchReport<Ticker> {
        self.apply_each(raws, |raw| self.remove(raw))
    }

    fn apply_each<R, F>(&self, raws: &[R], op: F) -> BatchReport<Ticker>
    where
        R: AsRef<str>,
        F: Fn(&str) -> Result<Ticker>,
    {
        let mut report = BatchReport::new();
        for raw in raws {
            let raw = raw.as_ref();
            let outcome = op(raw);
            if let Err(e) = &outcome {
                warn!("Skipping '{}': {}", raw, e);
            }
            report.push(raw, outcome);
        }
        report
    }

    fn load(&self) -> Result<Watchlist> {
        Ok(Watchlist::from_tickers(self.store.load()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// In-memory store that counts writes.
    #[derive(Default)]
    struct MemoryStore {
        tickers: RefCell<Vec<Ticker>>,
        saves: RefCell<usize>,
    }

    impl WatchlistStorage for MemoryStore {
        fn load(&self) -> Result<Vec<Ticker>> {
            Ok(self.tickers.borrow().clone())
        }

        fn save(&self, tickers: &[Ticker]) -> Result<()> {
            *self.tickers.borrow_mut() = tickers.to_vec();
            *self.saves.borrow_mut() += 1;
            Ok(())
        }
    }

    fn symbols(tickers: &[Ticker]) -> Vec<&str> {
        tickers.iter().map(Ticker::as_str).collect()
    }

    #[test]
    fn test_from_tickers_dedupes_and_sorts() -> Result<()> {
        let list = Watchlist::from_tickers(vec![
            Ticker::parse("msft")?,
            Ticker::parse("AAPL")?,
            Ticker::parse("MSFT")?,
        ]);
        assert_eq!(symbols(list.as_slice()), vec!["AAPL", "MSFT"]);
        Ok(())
    }

    #[test]
    fn test_insert_keeps_order() -> Result<()> {
        let mut list = Watchlist::default();
        list.insert(Ticker::parse("TSLA")?)?;
        list.insert(Ticker::parse("AAPL")?)?;
        list.insert(Ticker::parse("MSFT")?)?;
        assert_eq!(symbols(list.as_slice()), vec!["AAPL", "MSFT", "TSLA"]);
        assert!(list.contains(&Ticker::parse("msft")?));
        Ok(())
    }

    #[test]
    fn test_add_normalizes() -> Result<()> {
        let manager = WatchlistManager::new(MemoryStore::default());
        assert_eq!(manager.add(" aapl ")?.as_str(), "AAPL");
        assert_eq!(symbols(&manager.list()?), vec!["AAPL"]);
        Ok(())
    }

    #[test]
    fn test_add_twice_is_already_present() -> Result<()> {
        let manager = WatchlistManager::new(MemoryStore::default());
        manager.add("AAPL")?;
        assert!(matches!(
            manager.add("aapl"),
            Err(StockError::AlreadyPresent(t)) if t.as_str() == "AAPL"
        ));
        assert_eq!(symbols(&manager.list()?), vec!["AAPL"]);
        assert_eq!(*manager.store().saves.borrow(), 1);
        Ok(())
    }

    #[test]
    fn test_add_blank_is_empty_input() {
        let manager = WatchlistManager::new(MemoryStore::default());
        assert!(matches!(manager.add("  "), Err(StockError::EmptyInput)));
        assert_eq!(*manager.store().saves.borrow(), 0);
    }

    #[test]
    fn test_add_with_separator_is_invalid_symbol() -> Result<()> {
        let manager = WatchlistManager::new(MemoryStore::default());
        manager.add("MSFT")?;
        assert!(matches!(manager.add("a,b"), Err(StockError::InvalidSymbol(_))));
        assert_eq!(symbols(&manager.list()?), vec!["MSFT"]);
        assert_eq!(*manager.store().saves.borrow(), 1);
        Ok(())
    }

    #[test]
    fn test_remove_missing_is_not_present() -> Result<()> {
        let manager = WatchlistManager::new(MemoryStore::default());
        manager.add("AAPL")?;
        assert!(matches!(manager.remove("ZZZ"), Err(StockError::NotPresent(_))));
        assert!(matches!(manager.remove(""), Err(StockError::EmptyInput)));
        assert_eq!(symbols(&manager.list()?), vec!["AAPL"]);
        assert_eq!(*manager.store().saves.borrow(), 1);
        Ok(())
    }

    #[test]
    fn test_remove_keeps_remainder_sorted() -> Result<()> {
        let manager = WatchlistManager::new(MemoryStore::default());
        for raw in ["tsla", "aapl", "msft"] {
            manager.add(raw)?;
        }
        manager.remove("Msft")?;
        assert_eq!(symbols(&manager.list()?), vec!["AAPL", "TSLA"]);
        Ok(())
    }

    #[test]
    fn test_replace_drops_blanks_and_duplicates() -> Result<()> {
        let manager = WatchlistManager::new(MemoryStore::default());
        manager.add("NVDA")?;
        let stored = manager.replace(&["tsla", " ", "aapl", "TSLA ", "msft"])?;
        assert_eq!(symbols(&stored), vec!["AAPL", "MSFT", "TSLA"]);
        assert_eq!(symbols(&manager.list()?), vec!["AAPL", "MSFT", "TSLA"]);
        Ok(())
    }

    #[test]
    fn test_list_canonicalizes_unsorted_store() -> Result<()> {
        let store = MemoryStore::default();
        *store.tickers.borrow_mut() = vec![
            Ticker::parse("TSLA")?,
            Ticker::parse("AAPL")?,
            Ticker::parse("TSLA")?,
        ];
        let manager = WatchlistManager::new(store);
        assert_eq!(symbols(&manager.list()?), vec!["AAPL", "TSLA"]);
        Ok(())
    }

    #[test]
    fn test_add_many_continues_past_failures() -> Result<()> {
        let manager = WatchlistManager::new(MemoryStore::default());
        manager.add("MSFT")?;

        let report = manager.add_many(&["aapl", "msft", "", "tsla"]);
        let outcomes: Vec<bool> = report.items().iter().map(|i| i.is_ok()).collect();
        assert_eq!(outcomes, vec![true, false, false, true]);
        assert!(matches!(
            report.items()[1].outcome,
            Err(StockError::AlreadyPresent(_))
        ));
        assert!(matches!(report.items()[2].outcome, Err(StockError::EmptyInput)));
        assert_eq!(symbols(&manager.list()?), vec!["AAPL", "MSFT", "TSLA"]);
        Ok(())
    }

    #[test]
    fn test_remove_many_continues_past_failures() -> Result<()> {
        let manager = WatchlistManager::new(MemoryStore::default());
        manager.replace(&["AAPL", "MSFT", "TSLA"])?;

        let report = manager.remove_many(&["zzz", "aapl", "tsla"]);
        let failed: Vec<&str> = report.failures().map(|(item, _)| item).collect();
        assert_eq!(failed, vec!["zzz"]);
        assert_eq!(symbols(&manager.list()?), vec!["MSFT"]);
        Ok(())
    }
}
