//! Market data gateway.
//!
//! Live market data is volatile and may be partially missing: every field of
//! a [`MarketSnapshot`] is optional and absence is never replaced by zero.

pub mod fixture;

pub use fixture::StaticMarketData;

use crate::error::{DataError, Result};
use crate::sector::GicsSector;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::str::FromStr;

/// Per-request market data for one ticker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSnapshot {
    /// Ticker symbol
    pub ticker: String,
    /// Company long name
    pub long_name: Option<String>,
    /// Current share price
    pub spot_price: Option<f64>,
    /// Consensus forward EPS
    pub forward_eps: Option<f64>,
    /// Consensus forward P/E
    pub forward_pe: Option<f64>,
    /// Provider sector label
    pub sector_label: Option<String>,
    /// When the snapshot was taken
    pub fetched_at: Option<DateTime<Utc>>,
}

impl MarketSnapshot {
    /// A snapshot with every field unavailable.
    pub fn unavailable(ticker: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            ..Self::default()
        }
    }

    /// The provider label resolved to a GICS sector.
    pub fn sector(&self) -> Option<GicsSector> {
        self.sector_label.as_deref().and_then(GicsSector::from_label)
    }

    /// Display name: the long name when known, else the ticker.
    pub fn display_name(&self) -> &str {
        self.long_name.as_deref().unwrap_or(&self.ticker)
    }
}

/// Where a risk-free rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RateSource {
    /// Live 10-year treasury yield.
    Live,
    /// Configured constant used because the live feed failed.
    Fallback,
    /// Entered by the user; authoritative until changed.
    Manual,
}

impl fmt::Display for RateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Live => "live 10Y yield",
            Self::Fallback => "fallback",
            Self::Manual => "manual",
        };
        f.write_str(label)
    }
}

/// A risk-free rate (decimal, 0.04 = 4%) tagged with its source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskFreeRate {
    /// Rate as a decimal
    pub value: f64,
    /// Provenance
    pub source: RateSource,
}

impl RiskFreeRate {
    /// Create a tagged rate.
    pub const fn new(value: f64, source: RateSource) -> Self {
        Self { value, source }
    }

    /// Whether the fallback constant is in use.
    pub fn is_fallback(&self) -> bool {
        self.source == RateSource::Fallback
    }
}

/// Chart timeframe for price history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Timeframe {
    /// One month
    OneMonth,
    /// Three months
    ThreeMonths,
    /// Six months
    SixMonths,
    /// One year
    #[default]
    OneYear,
    /// Two years
    TwoYears,
    /// Five years
    FiveYears,
    /// Full history
    Max,
}

impl Timeframe {
    /// All timeframes, shortest first.
    pub const fn all() -> [Self; 7] {
        [
            Self::OneMonth,
            Self::ThreeMonths,
            Self::SixMonths,
            Self::OneYear,
            Self::TwoYears,
            Self::FiveYears,
            Self::Max,
        ]
    }

    /// Short label (`1M`, `1Y`, `Max`).
    pub const fn label(&self) -> &'static str {
        match self {
            Self::OneMonth => "1M",
            Self::ThreeMonths => "3M",
            Self::SixMonths => "6M",
            Self::OneYear => "1Y",
            Self::TwoYears => "2Y",
            Self::FiveYears => "5Y",
            Self::Max => "Max",
        }
    }

    /// Yahoo Finance range parameter.
    pub const fn range(&self) -> &'static str {
        match self {
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
            Self::Max => "max",
        }
    }
}

impl FromStr for Timeframe {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DataError::Parse(format!("unknown timeframe: {s}")))
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One daily close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading date
    pub date: NaiveDate,
    /// Closing price
    pub close: f64,
}

/// Source of live market data.
pub trait MarketDataGateway {
    /// Spot price, forward EPS, forward P/E and sector label for a ticker.
    fn quote(&self, ticker: &str) -> impl Future<Output = Result<MarketSnapshot>> + Send;

    /// Current 10-year treasury yield as a decimal.
    fn risk_free_rate(&self) -> impl Future<Output = Result<f64>> + Send;

    /// Daily closes over a chart timeframe, oldest first.
    fn price_history(
        &self,
        ticker: &str,
        timeframe: Timeframe,
    ) -> impl Future<Output = Result<Vec<PricePoint>>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1m", Timeframe::OneMonth, "1mo")]
    #[case("1Y", Timeframe::OneYear, "1y")]
    #[case("max", Timeframe::Max, "max")]
    fn test_timeframe_parse(#[case] raw: &str, #[case] expected: Timeframe, #[case] range: &str) {
        let parsed: Timeframe = raw.parse().unwrap();
        assert_eq!(parsed, expected);
        assert_eq!(parsed.range(), range);
    }

    #[test]
    fn test_timeframe_default_and_invalid() {
        assert_eq!(Timeframe::default(), Timeframe::OneYear);
        assert!("10Y".parse::<Timeframe>().is_err());
    }

    #[test]
    fn test_snapshot_sector_and_name() {
        let snapshot = MarketSnapshot {
            ticker: "AAPL".into(),
            sector_label: Some("Technology".into()),
            ..MarketSnapshot::default()
        };
        assert_eq!(snapshot.sector(), Some(GicsSector::InformationTechnology));
        assert_eq!(snapshot.display_name(), "AAPL");
        assert_eq!(MarketSnapshot::unavailable("X").forward_eps, None);
    }
}
