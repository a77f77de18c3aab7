//! Tunable pricing constants.

use crate::error::{ModelError, Result};
use crate::premium::FactorPremiums;
use serde::{Deserialize, Serialize};

/// Constants shared by the return estimator and the price forecaster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Long-run growth used by the capitalization formulas and the
    /// analyst-implied return.
    pub terminal_growth: f64,

    /// Risk-free rate used when the live 10-year yield is unavailable.
    pub fallback_risk_free: f64,

    /// Market premium of the forward-looking scenario.
    pub forward_market_premium: f64,

    /// Trailing-average monthly factor premiums.
    pub historical_premiums: FactorPremiums,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            terminal_growth: 0.03,
            fallback_risk_free: 0.04,
            forward_market_premium: 0.0442,
            historical_premiums: FactorPremiums::default(),
        }
    }
}

impl PricingConfig {
    /// Growth rate assumed by the analyst-implied return.
    pub const fn assumed_growth(&self) -> f64 {
        self.terminal_growth
    }

    /// Reject non-finite constants.
    pub fn validate(&self) -> Result<()> {
        let premiums = self.historical_premiums.as_array();
        let named = [
            ("terminal_growth", self.terminal_growth),
            ("fallback_risk_free", self.fallback_risk_free),
            ("forward_market_premium", self.forward_market_premium),
            ("historical_premiums.market", premiums[0]),
            ("historical_premiums.size", premiums[1]),
            ("historical_premiums.value", premiums[2]),
            ("historical_premiums.momentum", premiums[3]),
        ];

        match named.iter().find(|(_, v)| !v.is_finite()) {
            Some((name, value)) => Err(ModelError::InvalidParameter(format!(
                "{name} must be finite, got {value}"
            ))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PricingConfig::default();
        assert_eq!(config.terminal_growth, 0.03);
        assert_eq!(config.assumed_growth(), 0.03);
        assert_eq!(config.fallback_risk_free, 0.04);
        assert_eq!(config.forward_market_premium, 0.0442);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid() {
        let config = PricingConfig {
            terminal_growth: f64::NAN,
            ..PricingConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ModelError::InvalidParameter(_))
        ));
    }
}
