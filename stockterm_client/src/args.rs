//! Command-line arguments for StockTerm.
//!
//! This module defines the CLI interface using `clap`. Every option can also be
//! supplied through a `STOCKTERM_*` environment variable.
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use stockterm_common::Config;
use stockterm_common::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_WORKERS};
use stockterm_common::range::TimeRange;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "stockterm", version, about = "A terminal-based stock viewer", long_about = None)]
#[command(disable_help_subcommand = true)]
pub struct Args {
    /// Command to run: get, get-all, list, add, remove, help or version.
    pub command: Option<String>,

    /// Ticker argument of get, add and remove. Multiple tickers are separated by commas.
    pub tickers: Option<String>,

    /// Chart range used for quotes.
    #[arg(long, env = "STOCKTERM_RANGE", value_enum, default_value_t = TimeRange::OneDay)]
    pub range: TimeRange,

    /// Seconds allowed for fetching a whole batch of quotes.
    #[arg(long, env = "STOCKTERM_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Number of quotes fetched concurrently.
    #[arg(long, env = "STOCKTERM_WORKERS", default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Directory holding the watchlist. Defaults to ~/.stockterm.
    #[arg(long, env = "STOCKTERM_HOME")]
    pub home: Option<PathBuf>,

    /// Base URL of the chart service.
    #[arg(long, env = "STOCKTERM_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}

impl Args {
    /// Resolves the arguments into the application configuration.
    pub fn config(&self) -> Config {
        let dir = self.home.clone().unwrap_or_else(Config::default_dir);
        Config::new(dir)
            .with_range(self.range)
            .with_timeout(Duration::from_secs(self.timeout))
            .with_workers(self.workers)
            .with_base_url(&self.base_url)
    }
}
