//! Model families and the validated per-ticker coefficient record.

use crate::error::{DataError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of factor coefficients a row can carry.
pub const MAX_FACTORS: usize = 4;

/// Factor model family selected for a sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelFamily {
    /// Single-factor CAPM (market).
    Capm,
    /// Fama-French three-factor (market, size, value).
    ThreeFactor,
    /// Carhart four-factor (market, size, value, momentum).
    FourFactor,
}

impl ModelFamily {
    /// Number of betas the family carries.
    pub const fn factor_count(&self) -> usize {
        match self {
            Self::Capm => 1,
            Self::ThreeFactor => 3,
            Self::FourFactor => 4,
        }
    }

    /// Label used in the coefficient table.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Capm => "CAPM",
            Self::ThreeFactor => "FF3",
            Self::FourFactor => "Carhart",
        }
    }

    /// Parse a coefficient-table label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "CAPM" => Some(Self::Capm),
            "FF3" | "3-FACTOR" | "THREE-FACTOR" | "FAMA-FRENCH" => Some(Self::ThreeFactor),
            "CARHART" | "FF4" | "4-FACTOR" | "FOUR-FACTOR" => Some(Self::FourFactor),
            _ => None,
        }
    }

    /// All families, in increasing factor count.
    pub const fn all() -> [Self; 3] {
        [Self::Capm, Self::ThreeFactor, Self::FourFactor]
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validated model coefficients for one ticker.
///
/// `betas.len() == family.factor_count()` always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorModelSpec {
    family: ModelFamily,
    intercept: f64,
    betas: Vec<f64>,
}

impl SectorModelSpec {
    /// Build a spec from nullable table coefficients.
    ///
    /// Trailing absent or NaN coefficients are dropped. A present coefficient
    /// after a gap, or a count that disagrees with the family, is rejected.
    pub fn from_coefficients(
        ticker: &str,
        family: ModelFamily,
        intercept: f64,
        coefficients: [Option<f64>; MAX_FACTORS],
    ) -> Result<Self> {
        let present: Vec<Option<f64>> = coefficients
            .iter()
            .map(|c| c.filter(|v| !v.is_nan()))
            .collect();

        let last_present = present.iter().rposition(Option::is_some);
        let width = last_present.map_or(0, |idx| idx + 1);

        // Gaps inside the populated prefix count as missing coefficients.
        let betas: Vec<f64> = present[..width].iter().flatten().copied().collect();

        if betas.len() != width || betas.len() != family.factor_count() {
            return Err(DataError::ModelConsistency {
                ticker: ticker.to_string(),
                family,
                expected: family.factor_count(),
                found: betas.len(),
            });
        }

        if !intercept.is_finite() {
            return Err(DataError::Parse(format!(
                "intercept for {ticker} is not a finite number"
            )));
        }

        Ok(Self {
            family,
            intercept,
            betas,
        })
    }

    /// Model family.
    pub const fn family(&self) -> ModelFamily {
        self.family
    }

    /// Regression intercept (alpha).
    pub const fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Factor loadings in factor order.
    pub fn betas(&self) -> &[f64] {
        &self.betas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("CAPM", Some(ModelFamily::Capm))]
    #[case("ff3", Some(ModelFamily::ThreeFactor))]
    #[case("Carhart", Some(ModelFamily::FourFactor))]
    #[case("FF5", None)]
    fn test_from_label(#[case] label: &str, #[case] expected: Option<ModelFamily>) {
        assert_eq!(ModelFamily::from_label(label), expected);
    }

    #[test]
    fn test_trailing_nan_dropped() {
        let spec = SectorModelSpec::from_coefficients(
            "AAPL",
            ModelFamily::Capm,
            0.0021,
            [Some(1.12), Some(f64::NAN), None, None],
        )
        .unwrap();

        assert_eq!(spec.betas(), &[1.12]);
        assert_eq!(spec.family().factor_count(), spec.betas().len());
    }

    #[test]
    fn test_extra_coefficient_rejected() {
        let err = SectorModelSpec::from_coefficients(
            "AAPL",
            ModelFamily::Capm,
            0.0021,
            [Some(1.12), Some(0.3), None, None],
        )
        .unwrap_err();

        assert!(matches!(
            err,
            DataError::ModelConsistency {
                expected: 1,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_gap_rejected() {
        let err = SectorModelSpec::from_coefficients(
            "AMZN",
            ModelFamily::ThreeFactor,
            0.001,
            [Some(1.0), None, Some(0.2), Some(0.1)],
        )
        .unwrap_err();

        assert!(matches!(err, DataError::ModelConsistency { found: 3, .. }));
    }

    #[test]
    fn test_missing_coefficient_rejected() {
        let result = SectorModelSpec::from_coefficients(
            "AMZN",
            ModelFamily::FourFactor,
            0.001,
            [Some(1.0), Some(0.5), Some(0.2), None],
        );

        assert!(result.is_err());
    }
}
