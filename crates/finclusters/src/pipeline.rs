//! Dashboard pipeline.
//!
//! One run is an explicit chain: market data and risk-free rate, then
//! [`PeerSet`], then [`ReturnEstimates`], then [`PriceForecast`]. Each stage
//! takes the previous stage's output as input and nothing is shared between
//! runs.
//!
//! Failure policy:
//! - a ticker missing from the sector map ends the run with `NotFound`
//! - peer resolution failures leave the peer section unavailable, including
//!   sectors without a cluster model
//! - `ModelConsistency` and `Config` errors from the estimator end the run
//! - market-data failures degrade to an empty snapshot or the fallback rate

use crate::error::Result;
use crate::peers::{ClusterResolver, PeerSet};
use finclusters_data::{
    GicsSector, MarketDataGateway, MarketSnapshot, PricePoint, RateSource, ReferenceStore,
    RiskFreeRate, Timeframe, normalize_ticker,
};
use finclusters_models::{
    ExpectedReturn, ForecastInputs, ModelError, PremiumScenario, PriceForecast, PriceForecaster,
    PricingConfig, ReturnEstimator, ReturnRange, analyst_implied_return,
};
use finclusters_output::{CompanyProfile, DashboardReport, ReportBuilder};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Inputs of one dashboard run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Ticker to analyze
    pub ticker: String,
    /// Manual risk-free rate; overrides the live feed when set
    pub risk_free_override: Option<f64>,
    /// Premium scenario for every return estimate
    pub scenario: PremiumScenario,
}

impl AnalysisRequest {
    /// Request with the live risk-free rate and historical premiums.
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            risk_free_override: None,
            scenario: PremiumScenario::default(),
        }
    }

    /// Set or clear the manual risk-free rate.
    pub const fn with_risk_free(mut self, rate: Option<f64>) -> Self {
        self.risk_free_override = rate;
        self
    }

    /// Set the premium scenario.
    pub const fn with_scenario(mut self, scenario: PremiumScenario) -> Self {
        self.scenario = scenario;
        self
    }
}

/// Output of the Return Estimator stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnEstimates {
    /// Model-based expected return of the subject
    pub expected: ExpectedReturn,
    /// Min/max over peers under the subject's model
    pub peer_range: Option<ReturnRange>,
    /// Analyst-implied return from the forward P/E
    pub analyst: Option<f64>,
}

/// Everything a dashboard run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardOutput {
    /// The request that produced this output
    pub request: AnalysisRequest,
    /// Risk-free rate used
    pub risk_free: RiskFreeRate,
    /// Market data used
    pub snapshot: MarketSnapshot,
    /// GICS sector from the sector map, else from the market-data label
    pub sector: Option<GicsSector>,
    /// Peers, when resolution succeeded
    pub peer_set: Option<PeerSet>,
    /// Return estimates
    pub returns: ReturnEstimates,
    /// Price estimates
    pub forecast: PriceForecast,
    /// Why sections are unavailable
    pub notes: Vec<String>,
}

impl DashboardOutput {
    /// Normalized ticker of the run.
    pub fn ticker(&self) -> &str {
        &self.returns.expected.ticker
    }

    /// Peer tickers, empty when resolution failed.
    pub fn peers(&self) -> &[String] {
        self.peer_set.as_ref().map_or(&[], |set| set.peers.as_slice())
    }

    /// Build the dashboard report.
    pub fn to_report(&self) -> Result<DashboardReport> {
        let subject = self.peer_set.as_ref().map(|set| &set.subject);
        let company = CompanyProfile {
            name: self.snapshot.long_name.clone(),
            sector: self.sector,
            cluster: subject.map(|s| s.cluster_id),
            fiscal_year: subject.map(|s| s.fiscal_year),
            spot_price: self.snapshot.spot_price,
            forward_eps: self.snapshot.forward_eps,
            forward_pe: self.snapshot.forward_pe,
        };

        let report = self
            .notes
            .iter()
            .fold(ReportBuilder::new(), |builder, note| builder.note(note.as_str()))
            .ticker(self.ticker())
            .company(company)
            .risk_free(self.risk_free)
            .scenario(self.request.scenario)
            .peers(self.peers().to_vec())
            .expected_return(Some(self.returns.expected.clone()))
            .peer_returns(self.returns.peer_range.clone())
            .analyst_return(self.returns.analyst)
            .forecast(self.forecast)
            .build()?;

        Ok(report)
    }
}

/// Runs the pipeline against a reference store and a market-data gateway.
#[derive(Debug)]
pub struct Dashboard<'a, G> {
    store: &'a ReferenceStore,
    gateway: &'a G,
    pricing: &'a PricingConfig,
}

impl<'a, G: MarketDataGateway> Dashboard<'a, G> {
    /// Create a pipeline.
    pub const fn new(store: &'a ReferenceStore, gateway: &'a G, pricing: &'a PricingConfig) -> Self {
        Self {
            store,
            gateway,
            pricing,
        }
    }

    /// Cluster Resolver over the same store.
    pub const fn resolver(&self) -> ClusterResolver<'a> {
        ClusterResolver::new(self.store)
    }

    /// Risk-free rate: manual override, else the live feed, else the
    /// configured fallback.
    pub async fn risk_free_rate(&self, manual: Option<f64>) -> Result<RiskFreeRate> {
        if let Some(value) = manual {
            if !value.is_finite() {
                return Err(ModelError::InvalidParameter(format!(
                    "risk-free rate must be finite, got {value}"
                ))
                .into());
            }
            return Ok(RiskFreeRate::new(value, RateSource::Manual));
        }

        match self.gateway.risk_free_rate().await {
            Ok(value) if value.is_finite() => Ok(RiskFreeRate::new(value, RateSource::Live)),
            Ok(value) => {
                warn!(value, "live risk-free rate is not finite, using fallback");
                Ok(self.fallback_rate())
            }
            Err(e) => {
                warn!(error = %e, "live risk-free rate unavailable, using fallback");
                Ok(self.fallback_rate())
            }
        }
    }

    const fn fallback_rate(&self) -> RiskFreeRate {
        RiskFreeRate::new(self.pricing.fallback_risk_free, RateSource::Fallback)
    }

    /// Market snapshot, degraded to an empty one when the gateway fails.
    pub async fn snapshot(&self, ticker: &str) -> MarketSnapshot {
        match self.gateway.quote(ticker).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(%ticker, error = %e, "market data unavailable");
                MarketSnapshot::unavailable(ticker)
            }
        }
    }

    /// Daily closes for a chart timeframe.
    pub async fn price_history(&self, ticker: &str, timeframe: Timeframe) -> Result<Vec<PricePoint>> {
        Ok(self.gateway.price_history(&normalize_ticker(ticker), timeframe).await?)
    }

    /// Return Estimator stage.
    pub fn estimate_returns(
        &self,
        ticker: &str,
        peer_set: Option<&PeerSet>,
        snapshot: &MarketSnapshot,
        risk_free: RiskFreeRate,
        scenario: PremiumScenario,
    ) -> Result<ReturnEstimates> {
        let estimator = ReturnEstimator::new(self.store.coefficients(), self.pricing);
        let expected = estimator.expected_return(ticker, risk_free.value, scenario)?;

        let peer_range = match peer_set {
            Some(set) if !set.is_empty() => estimator.peer_return_range(
                expected.model_family,
                &set.peers,
                risk_free.value,
                scenario,
            )?,
            _ => None,
        };

        let analyst = analyst_implied_return(snapshot.forward_pe, self.pricing.assumed_growth());

        Ok(ReturnEstimates {
            expected,
            peer_range,
            analyst,
        })
    }

    /// Price Forecaster stage.
    pub fn forecast(&self, snapshot: &MarketSnapshot, returns: &ReturnEstimates) -> PriceForecast {
        let forecaster = PriceForecaster::new(self.pricing.terminal_growth);
        forecaster.forecast_prices(&ForecastInputs {
            forward_eps: snapshot.forward_eps,
            forward_pe: snapshot.forward_pe,
            model_return: Some(returns.expected.point),
            peer_min_return: returns.peer_range.as_ref().map(|r| r.min),
            peer_max_return: returns.peer_range.as_ref().map(|r| r.max),
        })
    }

    /// Run the full pipeline for one request.
    pub async fn run(&self, request: &AnalysisRequest) -> Result<DashboardOutput> {
        let ticker = normalize_ticker(&request.ticker);
        let resolver = self.resolver();
        let mapped_sector = resolver.mapped_sector(&ticker)?;
        info!(
            %ticker,
            sector = ?mapped_sector.map(|s| s.table_key()),
            scenario = %request.scenario,
            "dashboard run"
        );

        let mut notes = Vec::new();

        let risk_free = self.risk_free_rate(request.risk_free_override).await?;
        if risk_free.is_fallback() {
            notes.push(format!(
                "live risk-free rate unavailable; using fallback {:.2}%",
                risk_free.value * 100.0
            ));
        }

        let snapshot = self.snapshot(&ticker).await;
        let sector = mapped_sector.or_else(|| snapshot.sector());
        if snapshot.forward_eps.is_none() && snapshot.forward_pe.is_none() {
            notes.push("forward EPS and P/E unavailable".to_string());
        }

        let peer_set = match resolver.resolve_peers(&ticker) {
            Ok(set) => {
                if set.is_empty() {
                    notes.push("no active peers in cluster".to_string());
                }
                Some(set)
            }
            Err(e) => {
                warn!(%ticker, error = %e, "peer resolution failed");
                notes.push(format!("peers unavailable: {e}"));
                None
            }
        };

        let returns = self.estimate_returns(
            &ticker,
            peer_set.as_ref(),
            &snapshot,
            risk_free,
            request.scenario,
        )?;
        if peer_set.as_ref().is_some_and(|set| !set.is_empty()) && returns.peer_range.is_none() {
            notes.push("no peer has usable coefficients".to_string());
        }

        let forecast = self.forecast(&snapshot, &returns);
        info!(
            %ticker,
            expected = returns.expected.point,
            model_price = ?forecast.model_price,
            "dashboard complete"
        );

        Ok(DashboardOutput {
            request: request.clone(),
            risk_free,
            snapshot,
            sector,
            peer_set,
            returns,
            forecast,
            notes,
        })
    }
}
