//! Ticker symbols and helpers shared between the store, the watchlist and the CLI.
//!
//! A `Ticker` is always trimmed, uppercase and non-empty; constructing one is the
//! only normalization step in the system, so two tickers compare equal exactly
//! when their raw inputs normalize to the same symbol.
use std::fmt;
use std::io::Read;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::StockError;
use crate::result::Result;

/// Separator used by the persisted record and by comma lists on the command line.
pub const SEPARATOR: char = ',';

/// Normalized stock symbol.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Trims and uppercases `raw`.
    ///
    /// Fails with `EmptyInput` when nothing is left, and with `InvalidSymbol` when
    /// the symbol holds the record separator, whitespace or a control character,
    /// since such a symbol would not survive a store round trip.
    pub fn parse(raw: &str) -> Result<Self> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(StockError::EmptyInput);
        }
        if normalized
            .chars()
            .any(|c| c == SEPARATOR || c.is_whitespace() || c.is_control())
        {
            return Err(StockError::InvalidSymbol(normalized));
        }
        Ok(Ticker(normalized))
    }

    /// Symbol text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Ticker {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self> {
        Ticker::parse(s)
    }
}

impl TryFrom<String> for Ticker {
    type Error = StockError;

    fn try_from(value: String) -> Result<Self> {
        Ticker::parse(&value)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Trait providing record parsing for tickers.
pub trait TickerParser: Sized {
    /// Parses a comma-delimited record from `reader`.
    ///
    /// Each element is trimmed; empty elements are skipped, so an empty record
    /// yields an empty list rather than a list holding one empty symbol.
    fn parse_from_reader<R: Read>(reader: R) -> Result<Vec<Self>>;
}

impl TickerParser for Ticker {
    fn parse_from_reader<R: Read>(mut reader: R) -> Result<Vec<Self>> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;

        let mut tickers = Vec::new();
        if content.trim().is_empty() {
            return Ok(tickers);
        }
        for (position, element) in content.split(SEPARATOR).enumerate() {
            match Ticker::parse(element) {
                Ok(ticker) => tickers.push(ticker),
                Err(e) => warn!("Skipping watchlist entry at position {}: {}", position, e),
            }
        }
        Ok(tickers)
    }
}

/// Joins tickers into the persisted record form, e.g. `AAPL,MSFT`.
pub fn to_record(tickers: &[Ticker]) -> String {
    tickers
        .iter()
        .map(Ticker::as_str)
        .collect::<Vec<_>>()
        .join(&SEPARATOR.to_string())
}

/// Splits a comma list typed by the user, dropping blank pieces.
///
/// The pieces are returned raw (trimmed but not uppercased) so callers can report
/// outcomes against what the user typed.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(SEPARATOR)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(String::from)
        .collect()
}
