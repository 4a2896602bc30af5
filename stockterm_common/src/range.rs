//! Chart time ranges accepted by the quote service.
use clap::ValueEnum;
use strum_macros::{Display, EnumString};

/// Time range of the chart request.
///
/// Parses from and displays as the wire token (`1d`, `5d`, `1mo`, ...), both on the
/// command line and in the request query string.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum TimeRange {
    #[default]
    #[strum(serialize = "1d")]
    #[value(name = "1d")]
    OneDay,
    #[strum(serialize = "5d")]
    #[value(name = "5d")]
    FiveDays,
    #[strum(serialize = "1mo")]
    #[value(name = "1mo")]
    OneMonth,
    #[strum(serialize = "3mo")]
    #[value(name = "3mo")]
    ThreeMonths,
    #[strum(serialize = "6mo")]
    #[value(name = "6mo")]
    SixMonths,
    #[strum(serialize = "1y")]
    #[value(name = "1y")]
    OneYear,
    #[strum(serialize = "2y")]
    #[value(name = "2y")]
    TwoYears,
    #[strum(serialize = "5y")]
    #[value(name = "5y")]
    FiveYears,
    #[strum(serialize = "10y")]
    #[value(name = "10y")]
    TenYears,
    #[strum(serialize = "ytd")]
    #[value(name = "ytd")]
    YearToDate,
    #[strum(serialize = "max")]
    #[value(name = "max")]
    Max,
}

impl TimeRange {
    /// Sampling interval requested alongside the range.
    ///
    /// Intraday intervals are only served for short ranges.
    pub fn interval(self) -> &'static str {
        match self {
            TimeRange::OneDay | TimeRange::FiveDays => "2m",
            _ => "1d",
        }
    }
}
