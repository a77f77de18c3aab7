//! Dashboard report for one ticker.

use chrono::{DateTime, Utc};
use finclusters_data::{GicsSector, RiskFreeRate};
use finclusters_models::{ExpectedReturn, PremiumScenario, PriceForecast, ReturnRange};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required field was not set on the builder.
    #[error("Missing report field: {0}")]
    MissingField(&'static str),
}

/// Company identification and market data shown in the report header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// Long company name from the market snapshot.
    pub name: Option<String>,

    /// GICS sector from the reference tables.
    pub sector: Option<GicsSector>,

    /// Cluster id within the sector.
    pub cluster: Option<i64>,

    /// Fiscal year of the clustering financials.
    pub fiscal_year: Option<i32>,

    /// Latest spot price.
    pub spot_price: Option<f64>,

    /// Consensus forward EPS.
    pub forward_eps: Option<f64>,

    /// Consensus forward P/E.
    pub forward_pe: Option<f64>,
}

/// Complete dashboard for one ticker.
///
/// Sections that could not be computed are `None` (or empty for the peer
/// list). The reason is recorded in `notes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    /// Ticker symbol.
    pub ticker: String,

    /// Report generation timestamp.
    pub timestamp: DateTime<Utc>,

    /// Company header.
    pub company: CompanyProfile,

    /// Risk-free rate used by every return estimate.
    pub risk_free: RiskFreeRate,

    /// Premium scenario used by every return estimate.
    pub scenario: PremiumScenario,

    /// Active peers in the ticker's cluster.
    pub peers: Vec<String>,

    /// Model-based expected return.
    pub expected_return: Option<ExpectedReturn>,

    /// Min/max expected return over peers.
    pub peer_returns: Option<ReturnRange>,

    /// Analyst-implied expected return.
    pub analyst_return: Option<f64>,

    /// Price estimates.
    pub forecast: PriceForecast,

    /// Why sections are unavailable.
    pub notes: Vec<String>,
}

impl DashboardReport {
    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a report from JSON.
    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether the ticker has at least one peer.
    pub fn has_peers(&self) -> bool {
        !self.peers.is_empty()
    }

    /// Copy of the report without the generation timestamp, for comparing
    /// two runs on identical inputs.
    pub fn without_timestamp(&self) -> Self {
        Self {
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
            ..self.clone()
        }
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    ticker: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    company: CompanyProfile,
    risk_free: Option<RiskFreeRate>,
    scenario: PremiumScenario,
    peers: Vec<String>,
    expected_return: Option<ExpectedReturn>,
    peer_returns: Option<ReturnRange>,
    analyst_return: Option<f64>,
    forecast: PriceForecast,
    notes: Vec<String>,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ticker.
    pub fn ticker(mut self, ticker: impl Into<String>) -> Self {
        self.ticker = Some(ticker.into());
        self
    }

    /// Override the generation timestamp.
    pub const fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Set the company header.
    pub fn company(mut self, company: CompanyProfile) -> Self {
        self.company = company;
        self
    }

    /// Set the risk-free rate.
    pub const fn risk_free(mut self, risk_free: RiskFreeRate) -> Self {
        self.risk_free = Some(risk_free);
        self
    }

    /// Set the premium scenario.
    pub const fn scenario(mut self, scenario: PremiumScenario) -> Self {
        self.scenario = scenario;
        self
    }

    /// Set the peer list.
    pub fn peers(mut self, peers: Vec<String>) -> Self {
        self.peers = peers;
        self
    }

    /// Set the model-based expected return.
    pub fn expected_return(mut self, expected_return: Option<ExpectedReturn>) -> Self {
        self.expected_return = expected_return;
        self
    }

    /// Set the peer return range.
    pub fn peer_returns(mut self, peer_returns: Option<ReturnRange>) -> Self {
        self.peer_returns = peer_returns;
        self
    }

    /// Set the analyst-implied return.
    pub const fn analyst_return(mut self, analyst_return: Option<f64>) -> Self {
        self.analyst_return = analyst_return;
        self
    }

    /// Set the price forecast.
    pub const fn forecast(mut self, forecast: PriceForecast) -> Self {
        self.forecast = forecast;
        self
    }

    /// Record why a section is unavailable.
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Build the report.
    pub fn build(self) -> Result<DashboardReport, ReportError> {
        Ok(DashboardReport {
            ticker: self.ticker.ok_or(ReportError::MissingField("ticker"))?,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            company: self.company,
            risk_free: self.risk_free.ok_or(ReportError::MissingField("risk_free"))?,
            scenario: self.scenario,
            peers: self.peers,
            expected_return: self.expected_return,
            peer_returns: self.peer_returns,
            analyst_return: self.analyst_return,
            forecast: self.forecast,
            notes: self.notes,
        })
    }
}
