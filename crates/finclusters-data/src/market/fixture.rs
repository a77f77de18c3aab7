//! In-memory market data, loadable from a JSON snapshot file.
//!
//! ```json
//! {
//!   "risk_free_rate": 0.042,
//!   "quotes": { "AAPL": { "ticker": "AAPL", "forward_eps": 6.0, "forward_pe": 25.0 } },
//!   "history": { "AAPL": [ { "date": "2024-01-02", "close": 185.6 } ] }
//! }
//! ```

use crate::error::{DataError, Result};
use crate::market::{MarketDataGateway, MarketSnapshot, PricePoint, Timeframe};
use crate::reference::normalize_ticker;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Market data served from memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticMarketData {
    risk_free_rate: Option<f64>,
    quotes: HashMap<String, MarketSnapshot>,
    history: HashMap<String, Vec<PricePoint>>,
}

impl StaticMarketData {
    /// Empty data set: every request fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON snapshot file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let data: Self = serde_json::from_str(&contents)?;
        Ok(data.normalized())
    }

    fn normalized(self) -> Self {
        Self {
            risk_free_rate: self.risk_free_rate,
            quotes: self
                .quotes
                .into_iter()
                .map(|(k, mut v)| {
                    let key = normalize_ticker(&k);
                    v.ticker = key.clone();
                    (key, v)
                })
                .collect(),
            history: self
                .history
                .into_iter()
                .map(|(k, v)| (normalize_ticker(&k), v))
                .collect(),
        }
    }

    /// Set the risk-free rate served by the gateway.
    pub const fn with_risk_free_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = Some(rate);
        self
    }

    /// Add a quote.
    pub fn with_quote(mut self, snapshot: MarketSnapshot) -> Self {
        let key = normalize_ticker(&snapshot.ticker);
        self.quotes.insert(key, snapshot);
        self
    }

    /// Add a price history.
    pub fn with_history(mut self, ticker: &str, points: Vec<PricePoint>) -> Self {
        self.history.insert(normalize_ticker(ticker), points);
        self
    }
}

impl MarketDataGateway for StaticMarketData {
    async fn quote(&self, ticker: &str) -> Result<MarketSnapshot> {
        self.quotes
            .get(&normalize_ticker(ticker))
            .cloned()
            .ok_or_else(|| DataError::MissingData {
                symbol: ticker.to_string(),
                reason: "no quote in snapshot".to_string(),
            })
    }

    async fn risk_free_rate(&self) -> Result<f64> {
        self.risk_free_rate.ok_or_else(|| DataError::MissingData {
            symbol: "^TNX".to_string(),
            reason: "no risk-free rate in snapshot".to_string(),
        })
    }

    async fn price_history(&self, ticker: &str, _timeframe: Timeframe) -> Result<Vec<PricePoint>> {
        self.history
            .get(&normalize_ticker(ticker))
            .cloned()
            .ok_or_else(|| DataError::MissingData {
                symbol: ticker.to_string(),
                reason: "no price history in snapshot".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_quotes() {
        let data = StaticMarketData::new()
            .with_risk_free_rate(0.04)
            .with_quote(MarketSnapshot {
                ticker: "AAPL".into(),
                forward_eps: Some(6.0),
                ..MarketSnapshot::default()
            });

        let quote = data.quote("aapl").await.unwrap();
        assert_eq!(quote.forward_eps, Some(6.0));
        assert_eq!(data.risk_free_rate().await.unwrap(), 0.04);
        assert!(data.quote("MSFT").await.is_err());
        assert!(
            data.price_history("AAPL", Timeframe::OneYear)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_missing_rate() {
        let result = StaticMarketData::new().risk_free_rate().await;
        assert!(matches!(result, Err(DataError::MissingData { .. })));
    }

    #[test]
    fn test_json_snapshot() {
        let json = r#"{
            "risk_free_rate": 0.042,
            "quotes": { "aapl": { "forward_eps": 6.0, "forward_pe": 25.0 } },
            "history": { "AAPL": [ { "date": "2024-01-02", "close": 185.6 } ] }
        }"#;
        let data: StaticMarketData = serde_json::from_str(json).unwrap();
        let data = data.normalized();

        assert_eq!(data.quotes["AAPL"].ticker, "AAPL");
        assert_eq!(data.quotes["AAPL"].forward_pe, Some(25.0));
        assert_eq!(data.history["AAPL"].len(), 1);
    }
}
