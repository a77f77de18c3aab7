//! Factor-premium scenarios.

use crate::config::PricingConfig;
use crate::error::{ModelError, Result};
use finclusters_data::ModelFamily;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Monthly factor premiums in factor order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorPremiums {
    /// Market excess return (MKT - RF)
    pub market: f64,
    /// Small minus big (SMB)
    pub size: f64,
    /// High minus low (HML)
    pub value: f64,
    /// Momentum (MOM)
    pub momentum: f64,
}

impl Default for FactorPremiums {
    fn default() -> Self {
        Self {
            market: 0.01,
            size: 0.02,
            value: -0.01,
            momentum: 0.015,
        }
    }
}

impl FactorPremiums {
    /// Premiums as `[market, size, value, momentum]`.
    pub const fn as_array(&self) -> [f64; 4] {
        [self.market, self.size, self.value, self.momentum]
    }
}

/// Named premium configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PremiumScenario {
    /// Trailing-average premiums for every factor.
    #[default]
    Historical,
    /// Forward-looking market premium; CAPM only.
    ForwardLooking,
}

impl PremiumScenario {
    /// Canonical name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Historical => "historical",
            Self::ForwardLooking => "forward_looking",
        }
    }

    /// Whether the scenario can be applied to a model family.
    pub fn applies_to(&self, family: ModelFamily) -> bool {
        match self {
            Self::Historical => true,
            Self::ForwardLooking => family == ModelFamily::Capm,
        }
    }

    /// Premium vector for a model family, one entry per beta.
    pub fn premium_vector(&self, family: ModelFamily, config: &PricingConfig) -> Result<Array1<f64>> {
        if !self.applies_to(family) {
            return Err(ModelError::ScenarioNotApplicable {
                scenario: *self,
                family,
            });
        }

        let premiums = match self {
            Self::Historical => config.historical_premiums.as_array()[..family.factor_count()].to_vec(),
            Self::ForwardLooking => vec![config.forward_market_premium],
        };

        Ok(Array1::from(premiums))
    }
}

impl FromStr for PremiumScenario {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "historical" | "trailing" => Ok(Self::Historical),
            "forward_looking" | "forward" => Ok(Self::ForwardLooking),
            _ => Err(ModelError::UnknownScenario(s.to_string())),
        }
    }
}

impl fmt::Display for PremiumScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finclusters_data::ErrorKind;
    use rstest::rstest;

    #[rstest]
    #[case("historical", PremiumScenario::Historical)]
    #[case("Forward-Looking", PremiumScenario::ForwardLooking)]
    #[case("forward_looking", PremiumScenario::ForwardLooking)]
    #[case(" forward ", PremiumScenario::ForwardLooking)]
    fn test_parse(#[case] raw: &str, #[case] expected: PremiumScenario) {
        assert_eq!(raw.parse::<PremiumScenario>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_scenario() {
        let err = "bullish".parse::<PremiumScenario>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[rstest]
    #[case(ModelFamily::Capm, vec![0.01])]
    #[case(ModelFamily::ThreeFactor, vec![0.01, 0.02, -0.01])]
    #[case(ModelFamily::FourFactor, vec![0.01, 0.02, -0.01, 0.015])]
    fn test_historical_vector(#[case] family: ModelFamily, #[case] expected: Vec<f64>) {
        let vector = PremiumScenario::Historical
            .premium_vector(family, &PricingConfig::default())
            .unwrap();
        assert_eq!(vector.to_vec(), expected);
        assert_eq!(vector.len(), family.factor_count());
    }

    #[test]
    fn test_forward_looking_capm_only() {
        let config = PricingConfig::default();
        let vector = PremiumScenario::ForwardLooking
            .premium_vector(ModelFamily::Capm, &config)
            .unwrap();
        assert_eq!(vector.to_vec(), vec![0.0442]);

        let err = PremiumScenario::ForwardLooking
            .premium_vector(ModelFamily::ThreeFactor, &config)
            .unwrap_err();
        assert!(matches!(err, ModelError::ScenarioNotApplicable { .. }));
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
