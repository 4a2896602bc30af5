//! Flat-file persistence for the watchlist.
//!
//! The watchlist is stored as a single comma-delimited record such as
//! `AAPL,MSFT,TSLA` with no trailing newline. Writes replace the file in full
//! with one `fs::write`; that write is not atomic, so an interruption in the
//! middle of it can leave a truncated record behind.
use std::fs::{self, File};
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::Config;
use crate::result::Result;
use crate::tickers::{self, Ticker, TickerParser};

/// Storage seam used by the watchlist manager.
pub trait WatchlistStorage {
    /// Reads the stored tickers, creating an empty store when none exists.
    fn load(&self) -> Result<Vec<Ticker>>;
    /// Replaces the stored tickers with `tickers`.
    fn save(&self, tickers: &[Ticker]) -> Result<()>;
}

/// Result of a legacy migration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// Legacy content was copied into the store.
    Migrated,
    /// There is no legacy file.
    NothingToMigrate,
    /// The store already exists and was left alone.
    AlreadyMigrated,
}

/// Watchlist stored in a plain text file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the configured watchlist path.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.watchlist_path)
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copies `legacy_path` verbatim into the store if the store does not exist yet.
    ///
    /// A missing legacy file and an existing store are both successful no-ops.
    pub fn migrate_legacy(&self, legacy_path: &Path) -> Result<MigrationOutcome> {
        if !legacy_path.exists() {
            debug!("No legacy watchlist at {}", legacy_path.display());
            return Ok(MigrationOutcome::NothingToMigrate);
        }
        if self.path.exists() {
            debug!(
                "Watchlist {} already exists, skipping legacy migration",
                self.path.display()
            );
            return Ok(MigrationOutcome::AlreadyMigrated);
        }

        let content = fs::read(legacy_path)?;
        self.ensure_parent()?;
        fs::write(&self.path, content)?;
        info!(
            "Migrated legacy watchlist {} to {}",
            legacy_path.display(),
            self.path.display()
        );
        Ok(MigrationOutcome::Migrated)
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        Ok(())
    }
}

impl WatchlistStorage for FileStore {
    fn load(&self) -> Result<Vec<Ticker>> {
        match File::open(&self.path) {
            Ok(file) => Ticker::parse_from_reader(BufReader::new(file)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.ensure_parent()?;
                fs::write(&self.path, "")?;
                info!("Created empty watchlist at {}", self.path.display());
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, tickers: &[Ticker]) -> Result<()> {
        self.ensure_parent()?;
        fs::write(&self.path, tickers::to_record(tickers))?;
        debug!("Saved {} tickers to {}", tickers.len(), self.path.display());
        Ok(())
    }
}
