//! Quote data fetching from Yahoo Finance.

use crate::error::{DataError, Result};
use crate::market::{PricePoint, Timeframe};
use chrono::DateTime;
use std::time::Duration;
use tokio::time::sleep;
use yahoo_finance_api as yahoo;

/// Symbol of the CBOE 10-year treasury yield index (quoted in percent).
pub const TEN_YEAR_YIELD_SYMBOL: &str = "^TNX";

/// Yahoo Finance quote provider with optional rate limiting.
pub struct YahooQuoteProvider {
    provider: yahoo::YahooConnector,
    rate_limit_delay: Duration,
}

impl std::fmt::Debug for YahooQuoteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooQuoteProvider")
            .field("rate_limit_delay", &self.rate_limit_delay)
            .finish_non_exhaustive()
    }
}

impl YahooQuoteProvider {
    /// Create a new Yahoo Finance quote provider without rate limiting.
    pub fn new() -> Result<Self> {
        Self::with_rate_limit(Duration::ZERO)
    }

    /// Create a new Yahoo Finance quote provider that pauses after each request.
    pub fn with_rate_limit(rate_limit_delay: Duration) -> Result<Self> {
        Ok(Self {
            provider: yahoo::YahooConnector::new()?,
            rate_limit_delay,
        })
    }

    async fn throttle(&self) {
        if !self.rate_limit_delay.is_zero() {
            sleep(self.rate_limit_delay).await;
        }
    }

    /// Fetch the most recent close for a symbol.
    pub async fn latest_price(&self, symbol: &str) -> Result<f64> {
        if symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        let response = self.provider.get_latest_quotes(symbol, "1d").await?;
        let quote = response.last_quote()?;
        self.throttle().await;

        if quote.close.is_finite() && quote.close > 0.0 {
            Ok(quote.close)
        } else {
            Err(DataError::MissingData {
                symbol: symbol.to_string(),
                reason: format!("invalid close {}", quote.close),
            })
        }
    }

    /// Fetch the 10-year treasury yield as a decimal (4.25% -> 0.0425).
    pub async fn ten_year_yield(&self) -> Result<f64> {
        Ok(self.latest_price(TEN_YEAR_YIELD_SYMBOL).await? / 100.0)
    }

    /// Fetch daily closes for a chart timeframe, oldest first.
    pub async fn fetch_history(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<PricePoint>> {
        if symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        let response = self
            .provider
            .get_quote_range(symbol, "1d", timeframe.range())
            .await?;
        let quotes = response
            .quotes()
            .map_err(|e| DataError::YahooApi(e.to_string()))?;
        self.throttle().await;

        if quotes.is_empty() {
            return Err(DataError::MissingData {
                symbol: symbol.to_string(),
                reason: format!("No {timeframe} history returned from Yahoo Finance"),
            });
        }

        quotes
            .iter()
            .map(|q| {
                let date = DateTime::from_timestamp(q.timestamp as i64, 0)
                    .ok_or_else(|| {
                        DataError::TimeConversion(format!("invalid timestamp {}", q.timestamp))
                    })?
                    .date_naive();
                Ok(PricePoint {
                    date,
                    close: q.close,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_symbol() {
        let provider = YahooQuoteProvider::new().unwrap();

        let result = provider.latest_price("").await;
        assert!(matches!(result, Err(DataError::InvalidSymbol(_))));

        let result = provider.fetch_history("", Timeframe::OneMonth).await;
        assert!(matches!(result, Err(DataError::InvalidSymbol(_))));
    }
}
