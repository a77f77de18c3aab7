//! Yahoo Finance data providers.

pub mod fundamentals;
pub mod quotes;

pub use fundamentals::{YahooFundamentalsProvider, parse_quote_summary};
pub use quotes::{TEN_YEAR_YIELD_SYMBOL, YahooQuoteProvider};

use crate::error::Result;
use crate::market::{MarketDataGateway, MarketSnapshot, PricePoint, Timeframe};
use tracing::warn;

/// [`MarketDataGateway`] backed by Yahoo Finance.
///
/// Forward estimates come from the quote-summary endpoint; the spot price
/// falls back to the latest daily close when the summary lacks it.
#[derive(Debug)]
pub struct YahooGateway {
    quotes: YahooQuoteProvider,
    fundamentals: YahooFundamentalsProvider,
}

impl YahooGateway {
    /// Create a gateway with default providers.
    pub fn new() -> Result<Self> {
        Ok(Self {
            quotes: YahooQuoteProvider::new()?,
            fundamentals: YahooFundamentalsProvider::new()?,
        })
    }
}

impl MarketDataGateway for YahooGateway {
    async fn quote(&self, ticker: &str) -> Result<MarketSnapshot> {
        let mut snapshot = match self.fundamentals.fetch_snapshot(ticker).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(%ticker, error = %e, "quote summary unavailable, using price only");
                // Without the summary only the spot price can be recovered.
                let spot_price = self.quotes.latest_price(ticker).await?;
                return Ok(MarketSnapshot {
                    spot_price: Some(spot_price),
                    fetched_at: Some(chrono::Utc::now()),
                    ..MarketSnapshot::unavailable(ticker)
                });
            }
        };

        if snapshot.spot_price.is_none() {
            match self.quotes.latest_price(ticker).await {
                Ok(price) => snapshot.spot_price = Some(price),
                Err(e) => warn!(%ticker, error = %e, "spot price unavailable"),
            }
        }

        Ok(snapshot)
    }

    async fn risk_free_rate(&self) -> Result<f64> {
        self.quotes.ten_year_yield().await
    }

    async fn price_history(&self, ticker: &str, timeframe: Timeframe) -> Result<Vec<PricePoint>> {
        self.quotes.fetch_history(ticker, timeframe).await
    }
}
