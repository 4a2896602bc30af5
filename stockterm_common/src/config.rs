//! Resolved application configuration.
//!
//! A `Config` is built once at startup and handed to the store, the watchlist
//! manager and the quote client. Nothing reads configuration from globals.
use std::path::PathBuf;
use std::time::Duration;

use crate::range::TimeRange;

/// Directory created under the user's home for all StockTerm state.
pub const CONFIG_DIR_NAME: &str = ".stockterm";
/// File name of the persisted watchlist inside the config directory.
pub const WATCHLIST_FILE_NAME: &str = "watchlist.txt";
/// Location of the pre-directory watchlist file, relative to the working directory.
pub const LEGACY_WATCHLIST_PATH: &str = "./ggs.config";
/// Host serving the chart API.
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
/// Currency assumed when the quote service omits one.
pub const DEFAULT_CURRENCY: &str = "USD";
/// Upper bound on a whole fetch batch.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Number of concurrent quote requests.
pub const DEFAULT_WORKERS: usize = 4;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the persisted watchlist.
    pub watchlist_path: PathBuf,
    /// Path of the legacy watchlist file migrated on startup.
    pub legacy_path: PathBuf,
    /// Chart range used when a command does not ask for another one.
    pub default_range: TimeRange,
    /// Currency reported for quotes that carry none.
    pub default_currency: String,
    /// Base URL of the quote service.
    pub base_url: String,
    /// Deadline applied to a whole fetch batch.
    pub request_timeout: Duration,
    /// Worker threads used by batch fetches.
    pub workers: usize,
}

impl Config {
    /// Configuration rooted at `config_dir` with every other value defaulted.
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            watchlist_path: config_dir.into().join(WATCHLIST_FILE_NAME),
            legacy_path: PathBuf::from(LEGACY_WATCHLIST_PATH),
            default_range: TimeRange::default(),
            default_currency: DEFAULT_CURRENCY.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            workers: DEFAULT_WORKERS,
        }
    }

    /// `~/.stockterm`, or `./.stockterm` when the home directory cannot be determined.
    pub fn default_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME)
    }

    /// Overrides the chart range.
    pub fn with_range(mut self, range: TimeRange) -> Self {
        self.default_range = range;
        self
    }

    /// Overrides the quote service base URL. A trailing slash is dropped.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Overrides the batch deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Overrides the worker count; at least one worker is always used.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::default_dir())
    }
}
