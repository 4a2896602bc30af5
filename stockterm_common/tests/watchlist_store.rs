//! Watchlist manager over the real file store.
use std::fs;

use stockterm_common::store::{FileStore, MigrationOutcome, WatchlistStorage};
use stockterm_common::watchlist::WatchlistManager;
use stockterm_common::{Result, StockError, Ticker};
use tempfile::TempDir;

fn manager(dir: &TempDir) -> WatchlistManager<FileStore> {
    WatchlistManager::new(FileStore::new(dir.path().join("watchlist.txt")))
}

fn symbols(tickers: &[Ticker]) -> Vec<String> {
    tickers.iter().map(Ticker::to_string).collect()
}

fn assert_sorted_and_unique(tickers: &[Ticker]) {
    assert!(
        tickers.windows(2).all(|pair| pair[0] < pair[1]),
        "not strictly ascending: {:?}",
        tickers
    );
}

#[test]
fn add_normalizes_and_persists() -> Result<()> {
    let dir = TempDir::new()?;
    let manager = manager(&dir);

    manager.add(" aapl ")?;
    assert_eq!(symbols(&manager.list()?), vec!["AAPL"]);
    assert_eq!(fs::read_to_string(manager.store().path())?, "AAPL");
    Ok(())
}

#[test]
fn symbol_with_separator_never_reaches_the_record() -> Result<()> {
    let dir = TempDir::new()?;
    let manager = manager(&dir);
    manager.add("^gspc")?;

    assert!(matches!(manager.add("a,b"), Err(StockError::InvalidSymbol(_))));
    assert_eq!(fs::read_to_string(manager.store().path())?, "^GSPC");

    let reloaded = manager.list()?;
    manager.store().save(&reloaded)?;
    assert_eq!(manager.list()?, reloaded);
    assert_eq!(symbols(&reloaded), vec!["^GSPC"]);
    Ok(())
}

#[test]
fn second_add_is_rejected_and_store_unchanged() -> Result<()> {
    let dir = TempDir::new()?;
    let manager = manager(&dir);

    manager.add("msft")?;
    manager.add("aapl")?;
    let before = fs::read_to_string(manager.store().path())?;

    assert!(matches!(manager.add("MSFT"), Err(StockError::AlreadyPresent(_))));
    assert_eq!(fs::read_to_string(manager.store().path())?, before);
    assert_eq!(before, "AAPL,MSFT");
    Ok(())
}

#[test]
fn remove_missing_leaves_store_untouched() -> Result<()> {
    let dir = TempDir::new()?;
    let manager = manager(&dir);
    manager.replace(&["AAPL", "MSFT"])?;
    let before = fs::read(manager.store().path())?;

    assert!(matches!(manager.remove("ZZZ"), Err(StockError::NotPresent(_))));
    assert_eq!(fs::read(manager.store().path())?, before);
    Ok(())
}

#[test]
fn mixed_operations_keep_the_list_sorted_and_unique() -> Result<()> {
    let dir = TempDir::new()?;
    let manager = manager(&dir);

    manager.add_many(&["tsla", "AAPL", "nvda", "aapl", "Tsla"]);
    assert_sorted_and_unique(&manager.list()?);

    manager.remove_many(&["nvda", "zzz"]);
    assert_sorted_and_unique(&manager.list()?);

    manager.replace(&["msft", "goog", "MSFT", "", "amzn"])?;
    let stored = FileStore::new(manager.store().path()).load()?;
    assert_sorted_and_unique(&stored);
    assert_eq!(symbols(&stored), vec!["AMZN", "GOOG", "MSFT"]);

    manager.add("brk.b")?;
    assert_eq!(
        symbols(&manager.list()?),
        vec!["AMZN", "BRK.B", "GOOG", "MSFT"]
    );
    Ok(())
}

#[test]
fn batch_add_reports_each_item() -> Result<()> {
    let dir = TempDir::new()?;
    let manager = manager(&dir);
    manager.add("AAPL")?;

    let report = manager.add_many(&["aapl", "meta", "tsla"]);
    let failed: Vec<&str> = report.failures().map(|(item, _)| item).collect();
    assert_eq!(failed, vec!["aapl"]);
    assert_eq!(
        symbols(&report.into_successes()),
        vec!["META", "TSLA"]
    );
    assert_eq!(symbols(&manager.list()?), vec!["AAPL", "META", "TSLA"]);
    Ok(())
}

#[test]
fn legacy_migration_is_one_time() -> Result<()> {
    let dir = TempDir::new()?;
    let legacy = dir.path().join("ggs.config");
    fs::write(&legacy, "AAPL,TSLA")?;
    let store = FileStore::new(dir.path().join(".stockterm").join("watchlist.txt"));

    assert_eq!(store.migrate_legacy(&legacy)?, MigrationOutcome::Migrated);
    assert_eq!(symbols(&store.load()?), vec!["AAPL", "TSLA"]);

    fs::write(&legacy, "NVDA")?;
    assert_eq!(
        store.migrate_legacy(&legacy)?,
        MigrationOutcome::AlreadyMigrated
    );
    assert_eq!(symbols(&store.load()?), vec!["AAPL", "TSLA"]);
    Ok(())
}
