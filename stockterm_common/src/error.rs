//! Error types shared between the watchlist, the quote fetcher and the CLI.
//!
//! The `StockError` enum unifies watchlist validation failures, persistence I/O,
//! quote service failures and command-line misuse, allowing every layer to
//! propagate a single error type.
use std::io;

use thiserror::Error;

use crate::tickers::Ticker;

/// Unified error type shared by the library and the client binary.
#[derive(Error, Debug)]
pub enum StockError {
    /// Input was empty after trimming whitespace.
    #[error("ticker cannot be empty")]
    EmptyInput,

    /// Symbol holds the list separator, whitespace or a control character.
    #[error("invalid ticker symbol '{0}'")]
    InvalidSymbol(String),

    /// Ticker is already part of the watchlist.
    #[error("ticker {0} is already in the watchlist")]
    AlreadyPresent(Ticker),

    /// Ticker is not part of the watchlist.
    #[error("ticker {0} is not in the watchlist")]
    NotPresent(Ticker),

    /// I/O error while reading or writing the watchlist store.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Transport-level failure talking to the quote service.
    #[error("network error: {0}")]
    Network(String),

    /// The request deadline elapsed before a response arrived.
    #[error("request timed out")]
    Timeout,

    /// The quote service answered with a non-success HTTP status.
    #[error("unexpected status code: {0}")]
    BadStatus(u16),

    /// The quote service response body could not be decoded.
    #[error("error decoding response: {0}")]
    Decode(String),

    /// Well-formed response that carried no quote data for the symbol.
    #[error("no data returned for {0}")]
    NoData(Ticker),

    /// The quote service answered for a different symbol than the one requested.
    #[error("requested {requested} but received a quote for {received}")]
    UnexpectedSymbol {
        /// Symbol sent to the service.
        requested: Ticker,
        /// Symbol reported in the response.
        received: Ticker,
    },

    /// The operation was interrupted by the operator.
    #[error("operation cancelled")]
    Cancelled,

    /// Command-line argument missing or malformed.
    #[error("{0}")]
    InvalidArgument(String),

    /// Unknown command word. Carries the offending word.
    #[error("invalid command: '{0}'")]
    InvalidCommand(String),
}

impl From<reqwest::Error> for StockError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StockError::Timeout
        } else if err.is_decode() {
            StockError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            StockError::BadStatus(status.as_u16())
        } else {
            StockError::Network(err.to_string())
        }
    }
}
