//! Expected-return estimation.
//!
//! Expected monthly return of a ticker:
//! E[R] = alpha + beta · premiums + RF
//!
//! The peer range applies the query ticker's model family and premium
//! scenario to every peer, and reports the plain min/max of the peers that
//! could be evaluated.

use crate::config::PricingConfig;
use crate::error::{ModelError, Result};
use crate::premium::PremiumScenario;
use finclusters_data::{CoefficientTable, ModelFamily, SectorModelSpec, normalize_ticker};
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Point estimate for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedReturn {
    /// Ticker symbol
    pub ticker: String,
    /// Expected monthly return (decimal)
    pub point: f64,
    /// Model family used
    pub model_family: ModelFamily,
    /// Premium scenario used
    pub scenario: PremiumScenario,
    /// Risk-free rate added to the model premium
    pub risk_free: f64,
}

/// Min/max expected return across successfully evaluated peers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnRange {
    /// Lowest peer return
    pub min: f64,
    /// Highest peer return
    pub max: f64,
    /// Peers that contributed to the range
    pub evaluated: Vec<String>,
    /// Peers skipped for missing or mismatched coefficients
    pub skipped: Vec<String>,
}

/// Evaluates factor models against the coefficient table.
#[derive(Debug, Clone, Copy)]
pub struct ReturnEstimator<'a> {
    coefficients: &'a CoefficientTable,
    config: &'a PricingConfig,
}

impl<'a> ReturnEstimator<'a> {
    /// Create an estimator.
    pub const fn new(coefficients: &'a CoefficientTable, config: &'a PricingConfig) -> Self {
        Self {
            coefficients,
            config,
        }
    }

    /// Expected monthly return of a ticker.
    ///
    /// # Errors
    /// - `NotFound` when the ticker has no coefficient row
    /// - `Config` for a scenario that does not apply to the ticker's family
    /// - `ModelConsistency` when the stored coefficients disagree with the family
    pub fn expected_return(
        &self,
        ticker: &str,
        risk_free: f64,
        scenario: PremiumScenario,
    ) -> Result<ExpectedReturn> {
        check_rate(risk_free)?;
        let ticker = normalize_ticker(ticker);
        let spec = self.coefficients.model_spec(&ticker)?;
        let premiums = scenario.premium_vector(spec.family(), self.config)?;
        let point = evaluate(&ticker, spec, premiums.view(), risk_free)?;

        debug!(%ticker, family = %spec.family(), %scenario, point, "expected return");

        Ok(ExpectedReturn {
            ticker,
            point,
            model_family: spec.family(),
            scenario,
            risk_free,
        })
    }

    /// Expected-return range over peers, using `family`'s premium vector.
    ///
    /// Peers without usable coefficients are skipped. Returns `Ok(None)` when
    /// no peer could be evaluated.
    pub fn peer_return_range(
        &self,
        family: ModelFamily,
        peers: &[String],
        risk_free: f64,
        scenario: PremiumScenario,
    ) -> Result<Option<ReturnRange>> {
        check_rate(risk_free)?;
        let premiums = scenario.premium_vector(family, self.config)?;

        let mut returns = Vec::with_capacity(peers.len());
        let mut evaluated = Vec::new();
        let mut skipped = Vec::new();

        for peer in peers {
            let outcome = self
                .coefficients
                .model_spec(peer)
                .map_err(ModelError::from)
                .and_then(|spec| evaluate(peer, spec, premiums.view(), risk_free));

            match outcome {
                Ok(value) => {
                    returns.push(value);
                    evaluated.push(peer.clone());
                }
                Err(e) => {
                    debug!(%peer, error = %e, "peer skipped");
                    skipped.push(peer.clone());
                }
            }
        }

        let Some(min) = returns.iter().copied().reduce(f64::min) else {
            return Ok(None);
        };
        let max = returns.iter().copied().fold(min, f64::max);

        Ok(Some(ReturnRange {
            min,
            max,
            evaluated,
            skipped,
        }))
    }
}

fn check_rate(risk_free: f64) -> Result<()> {
    if risk_free.is_finite() {
        Ok(())
    } else {
        Err(ModelError::InvalidParameter(format!(
            "risk-free rate must be finite, got {risk_free}"
        )))
    }
}

/// `intercept + betas · premiums + risk_free`.
fn evaluate(
    ticker: &str,
    spec: &SectorModelSpec,
    premiums: ArrayView1<'_, f64>,
    risk_free: f64,
) -> Result<f64> {
    if spec.betas().len() != premiums.len() {
        return Err(ModelError::DimensionMismatch {
            ticker: ticker.to_string(),
            betas: spec.betas().len(),
            premiums: premiums.len(),
        });
    }

    let betas = Array1::from(spec.betas().to_vec());
    Ok(spec.intercept() + betas.dot(&premiums) + risk_free)
}
