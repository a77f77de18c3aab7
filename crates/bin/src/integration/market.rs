//! Market data source selection.
//!
//! Live Yahoo Finance data by default, or a JSON snapshot file for offline
//! use.

use finclusters_data::{
    MarketDataGateway, MarketSnapshot, PricePoint, Result, StaticMarketData, Timeframe,
    YahooGateway,
};
use std::path::Path;
use tracing::info;

/// The gateway chosen on the command line.
#[derive(Debug)]
pub(crate) enum MarketSource {
    Yahoo(YahooGateway),
    Snapshot(StaticMarketData),
}

impl MarketSource {
    /// Snapshot file if given, else live Yahoo Finance.
    pub(crate) fn open(snapshot: Option<&Path>) -> Result<Self> {
        match snapshot {
            Some(path) => {
                info!(path = %path.display(), "using market data snapshot");
                Ok(Self::Snapshot(StaticMarketData::from_path(path)?))
            }
            None => Ok(Self::Yahoo(YahooGateway::new()?)),
        }
    }

    pub(crate) const fn is_live(&self) -> bool {
        matches!(self, Self::Yahoo(_))
    }
}

impl MarketDataGateway for MarketSource {
    async fn quote(&self, ticker: &str) -> Result<MarketSnapshot> {
        match self {
            Self::Yahoo(gateway) => gateway.quote(ticker).await,
            Self::Snapshot(gateway) => gateway.quote(ticker).await,
        }
    }

    async fn risk_free_rate(&self) -> Result<f64> {
        match self {
            Self::Yahoo(gateway) => gateway.risk_free_rate().await,
            Self::Snapshot(gateway) => gateway.risk_free_rate().await,
        }
    }

    async fn price_history(&self, ticker: &str, timeframe: Timeframe) -> Result<Vec<PricePoint>> {
        match self {
            Self::Yahoo(gateway) => gateway.price_history(ticker, timeframe).await,
            Self::Snapshot(gateway) => gateway.price_history(ticker, timeframe).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_snapshot_source_delegates() {
        let source = MarketSource::Snapshot(StaticMarketData::new().with_risk_free_rate(0.041));
        assert!(!source.is_live());
        assert_eq!(source.risk_free_rate().await.unwrap(), 0.041);
        assert!(source.quote("AAPL").await.is_err());
    }

    #[test]
    fn test_live_source_without_snapshot() {
        let source = MarketSource::open(None).unwrap();
        assert!(source.is_live());
    }

    #[test]
    fn test_missing_snapshot_file() {
        let result = MarketSource::open(Some(Path::new("/nonexistent/snapshot.json")));
        assert!(result.is_err());
    }
}
