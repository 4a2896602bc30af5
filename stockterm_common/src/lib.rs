//!
//! Core of StockTerm: watchlist management and quote fetching.
//!
//! This crate aggregates:
//! - `error`: unified error type `StockError` used across the workspace.
//! - `result`: handy `Result<T, StockError>` alias.
//! - `tickers`: normalized ticker symbols and record parsing.
//! - `range`: chart time ranges accepted by the quote service.
//! - `config`: resolved paths and defaults, built once at startup.
//! - `store`: flat-file watchlist persistence and legacy migration.
//! - `watchlist`: membership rules and the read-modify-write manager.
//! - `batch`: per-item outcomes of best-effort batch operations.
//! - `quote`: chart API payload and derived quote snapshots.
//! - `fetcher`: HTTP client and the concurrent batch fetcher.
//! - `interrupt`: operator interrupt signal shared with the Ctrl+C handler.
//! - `editor`: state machine of the interactive watchlist editor.
#![warn(missing_docs)]
pub mod batch;
pub mod config;
pub mod editor;
pub mod error;
pub mod fetcher;
pub mod interrupt;
pub mod quote;
pub mod range;
pub mod result;
pub mod store;
pub mod tickers;
pub mod watchlist;

pub use batch::BatchReport;
pub use config::Config;
pub use error::StockError;
pub use interrupt::Interrupt;
pub use result::Result;
pub use tickers::Ticker;
