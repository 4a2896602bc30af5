//! Chart API payload and the quote snapshot derived from it.
//!
//! The chart endpoint returns a JSON document whose `chart.result[0].meta` block
//! carries the latest price and the previous close; the time-series arrays are
//! decoded but not used for the snapshot. Prices are decoded straight into
//! `Decimal` so change and percent change are computed without float drift.
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::tickers::Ticker;

/// Top-level chart API response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    /// Response body.
    pub chart: Chart,
}

/// Result list and error slot of a chart response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Chart {
    /// One entry per requested symbol. `null` when the service reports an error.
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    /// Service-side error description.
    #[serde(default)]
    pub error: Option<ChartError>,
}

/// Error block returned by the chart API, e.g. for unknown symbols.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartError {
    /// Short error code such as `Not Found`.
    pub code: String,
    /// Human readable description.
    #[serde(default)]
    pub description: String,
}

/// Chart data for one symbol.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    /// Quote metadata.
    pub meta: ChartMeta,
    /// Sample timestamps in seconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: Vec<i64>,
    /// Price series aligned with `timestamp`.
    #[serde(default)]
    pub indicators: Indicators,
}

/// Metadata block of a chart result.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub symbol: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub exchange_name: Option<String>,
    #[serde(default)]
    pub instrument_type: Option<String>,
    #[serde(default)]
    pub regular_market_time: Option<i64>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub regular_market_price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub previous_close: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub chart_previous_close: Option<Decimal>,
    #[serde(default)]
    pub data_granularity: Option<String>,
    #[serde(default)]
    pub range: Option<String>,
}

/// Indicator series of a chart result.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<IndicatorQuote>,
}

/// OHLCV series. Gaps in trading are reported as `null`.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndicatorQuote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<u64>>,
}

impl ChartMeta {
    /// Previous close, falling back to the chart's previous close used by ranges
    /// longer than one day. Zero when neither is reported.
    pub fn effective_previous_close(&self) -> Decimal {
        self.previous_close
            .or(self.chart_previous_close)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Point-in-time quote for one ticker.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteSnapshot {
    pub ticker: Ticker,
    pub last_price: Decimal,
    /// `last_price - previous_close`.
    pub change: Decimal,
    /// `change / previous_close * 100`; `None` when the previous close is zero.
    pub change_percent: Option<Decimal>,
    pub previous_close: Decimal,
    pub currency: String,
    pub exchange: Option<String>,
    pub market_time: Option<DateTime<Utc>>,
}

impl QuoteSnapshot {
    /// Snapshot of the first result in `response`.
    ///
    /// Returns `None` when the response has no result, or its metadata has no
    /// symbol or no market price.
    pub fn from_chart(response: &ChartResponse, default_currency: &str) -> Option<Self> {
        let result = response.chart.result.as_ref()?.first()?;
        Self::from_meta(&result.meta, default_currency)
    }

    /// Snapshot derived from chart metadata.
    pub fn from_meta(meta: &ChartMeta, default_currency: &str) -> Option<Self> {
        let ticker = Ticker::parse(&meta.symbol).ok()?;
        let last_price = meta.regular_market_price?;
        let previous_close = meta.effective_previous_close();
        let change = last_price - previous_close;
        let currency = meta
            .currency
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(default_currency)
            .to_string();

        Some(Self {
            ticker,
            last_price,
            change,
            change_percent: percent_change(change, previous_close),
            previous_close,
            currency,
            exchange: meta.exchange_name.clone(),
            market_time: meta
                .regular_market_time
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        })
    }
}

/// `change / base * 100`, or `None` when `base` is zero.
pub fn percent_change(change: Decimal, base: Decimal) -> Option<Decimal> {
    change
        .checked_div(base)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
}
