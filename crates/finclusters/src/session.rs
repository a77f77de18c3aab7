//! Session context for the interactive shell.
//!
//! Holds the user's current selections and the last dashboard computed from
//! them. Any change of selection drops the stored dashboard, so it never
//! describes inputs other than the current ones.

use crate::error::{PipelineError, Result};
use crate::pipeline::{AnalysisRequest, Dashboard, DashboardOutput};
use finclusters_data::{DataError, MarketDataGateway, normalize_ticker};
use finclusters_models::{ModelError, PremiumScenario};
use tracing::debug;

/// Selections and last output of one interactive session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    ticker: Option<String>,
    risk_free_override: Option<f64>,
    scenario: PremiumScenario,
    last: Option<DashboardOutput>,
}

impl Session {
    /// Empty session: no ticker, live risk-free rate, historical premiums.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected ticker.
    pub fn ticker(&self) -> Option<&str> {
        self.ticker.as_deref()
    }

    /// Manual risk-free rate, if set.
    pub const fn risk_free_override(&self) -> Option<f64> {
        self.risk_free_override
    }

    /// Selected premium scenario.
    pub const fn scenario(&self) -> PremiumScenario {
        self.scenario
    }

    /// Last computed dashboard.
    pub const fn last(&self) -> Option<&DashboardOutput> {
        self.last.as_ref()
    }

    /// Select a ticker. Returns whether the selection changed.
    pub fn select_ticker(&mut self, ticker: &str) -> Result<bool> {
        let ticker = normalize_ticker(ticker);
        if ticker.is_empty() {
            return Err(DataError::InvalidSymbol("ticker must not be empty".to_string()).into());
        }

        if self.ticker.as_deref() == Some(ticker.as_str()) {
            return Ok(false);
        }

        debug!(%ticker, "ticker selected");
        self.ticker = Some(ticker);
        self.last = None;
        Ok(true)
    }

    /// Set the manual risk-free rate, or `None` to return to the live feed.
    /// The override stays in force across ticker changes.
    pub fn set_risk_free(&mut self, rate: Option<f64>) -> Result<()> {
        if let Some(value) = rate.filter(|v| !v.is_finite()) {
            return Err(ModelError::InvalidParameter(format!(
                "risk-free rate must be finite, got {value}"
            ))
            .into());
        }

        if self.risk_free_override != rate {
            self.risk_free_override = rate;
            self.last = None;
        }
        Ok(())
    }

    /// Select a premium scenario.
    pub fn set_scenario(&mut self, scenario: PremiumScenario) {
        if self.scenario != scenario {
            self.scenario = scenario;
            self.last = None;
        }
    }

    /// Request for the current selections.
    pub fn request(&self) -> Result<AnalysisRequest> {
        let ticker = self.ticker.clone().ok_or(PipelineError::NoTicker)?;
        Ok(AnalysisRequest::new(ticker)
            .with_risk_free(self.risk_free_override)
            .with_scenario(self.scenario))
    }

    /// Recompute the dashboard for the current selections and store it.
    ///
    /// On error the previous output is dropped.
    pub async fn refresh<G: MarketDataGateway>(
        &mut self,
        dashboard: &Dashboard<'_, G>,
    ) -> Result<&DashboardOutput> {
        self.last = None;
        let request = self.request()?;
        let output = dashboard.run(&request).await?;
        Ok(self.last.insert(output))
    }
}
