//! Forward estimates and company profile from the Yahoo Finance
//! quote-summary endpoint.

use crate::error::{DataError, Result};
use crate::market::MarketSnapshot;
use chrono::Utc;
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;

const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const MODULES: &str = "price,summaryProfile,summaryDetail,defaultKeyStatistics,financialData";

/// Yahoo Finance quote-summary provider.
#[derive(Debug)]
pub struct YahooFundamentalsProvider {
    client: reqwest::Client,
    rate_limit_delay: Duration,
}

impl YahooFundamentalsProvider {
    /// Create a new provider without rate limiting.
    pub fn new() -> Result<Self> {
        Self::with_rate_limit(Duration::ZERO)
    }

    /// Create a new provider that pauses after each request.
    pub fn with_rate_limit(rate_limit_delay: Duration) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)")
                .timeout(Duration::from_secs(20))
                .build()?,
            rate_limit_delay,
        })
    }

    /// Fetch forward EPS, forward P/E, price, sector and name for a symbol.
    pub async fn fetch_snapshot(&self, symbol: &str) -> Result<MarketSnapshot> {
        if symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        let body: Value = self
            .client
            .get(format!("{QUOTE_SUMMARY_URL}/{symbol}"))
            .query(&[("modules", MODULES)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !self.rate_limit_delay.is_zero() {
            sleep(self.rate_limit_delay).await;
        }

        parse_quote_summary(symbol, &body)
    }
}

/// Numeric field: either `{"raw": x, "fmt": "..."}` or a bare number.
fn number(module: &Value, field: &str) -> Option<f64> {
    let value = module.get(field)?;
    value
        .get("raw")
        .and_then(Value::as_f64)
        .or_else(|| value.as_f64())
        .filter(|v| v.is_finite())
}

fn text(module: &Value, field: &str) -> Option<String> {
    module
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Extract a [`MarketSnapshot`] from a quote-summary response body.
pub fn parse_quote_summary(symbol: &str, body: &Value) -> Result<MarketSnapshot> {
    let summary = &body["quoteSummary"];

    if let Some(error) = summary.get("error").filter(|e| !e.is_null()) {
        let description = error
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(DataError::YahooApi(format!("{symbol}: {description}")));
    }

    let result = summary
        .get("result")
        .and_then(|r| r.get(0))
        .ok_or_else(|| DataError::MissingData {
            symbol: symbol.to_string(),
            reason: "empty quote summary".to_string(),
        })?;

    let price = &result["price"];
    let profile = &result["summaryProfile"];
    let detail = &result["summaryDetail"];
    let statistics = &result["defaultKeyStatistics"];
    let financial = &result["financialData"];

    Ok(MarketSnapshot {
        ticker: symbol.to_string(),
        long_name: text(price, "longName").or_else(|| text(price, "shortName")),
        spot_price: number(financial, "currentPrice")
            .or_else(|| number(price, "regularMarketPrice")),
        forward_eps: number(statistics, "forwardEps"),
        forward_pe: number(detail, "forwardPE").or_else(|| number(statistics, "forwardPE")),
        sector_label: text(profile, "sector"),
        fetched_at: Some(Utc::now()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_response() {
        let body = json!({
            "quoteSummary": {
                "result": [{
                    "price": { "longName": "Apple Inc.", "regularMarketPrice": { "raw": 189.5 } },
                    "summaryProfile": { "sector": "Technology" },
                    "summaryDetail": { "forwardPE": { "raw": 28.4, "fmt": "28.40" } },
                    "defaultKeyStatistics": { "forwardEps": { "raw": 7.1 } },
                    "financialData": { "currentPrice": { "raw": 190.0 } }
                }],
                "error": null
            }
        });

        let snapshot = parse_quote_summary("AAPL", &body).unwrap();
        assert_eq!(snapshot.long_name.as_deref(), Some("Apple Inc."));
        assert_eq!(snapshot.spot_price, Some(190.0));
        assert_eq!(snapshot.forward_pe, Some(28.4));
        assert_eq!(snapshot.forward_eps, Some(7.1));
        assert_eq!(snapshot.sector_label.as_deref(), Some("Technology"));
    }

    #[test]
    fn test_parse_partial_response() {
        let body = json!({
            "quoteSummary": {
                "result": [{
                    "price": { "regularMarketPrice": { "raw": 12.0 } },
                    "defaultKeyStatistics": { "forwardPE": { "raw": -4.0 }, "forwardEps": {} }
                }],
                "error": null
            }
        });

        let snapshot = parse_quote_summary("XYZ", &body).unwrap();
        assert_eq!(snapshot.spot_price, Some(12.0));
        assert_eq!(snapshot.forward_pe, Some(-4.0));
        assert_eq!(snapshot.forward_eps, None);
        assert_eq!(snapshot.sector_label, None);
    }

    #[test]
    fn test_parse_error_response() {
        let body = json!({
            "quoteSummary": {
                "result": null,
                "error": { "code": "Not Found", "description": "Quote not found for ticker symbol: ZZZZ" }
            }
        });

        let result = parse_quote_summary("ZZZZ", &body);
        assert!(matches!(result, Err(DataError::YahooApi(_))));
    }

    #[tokio::test]
    async fn test_invalid_symbol() {
        let provider = YahooFundamentalsProvider::new().unwrap();
        let result = provider.fetch_snapshot("").await;
        assert!(matches!(result, Err(DataError::InvalidSymbol(_))));
    }
}
