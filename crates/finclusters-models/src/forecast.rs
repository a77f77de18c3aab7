//! Price forecasting.
//!
//! Three independent estimates, each of which may be unavailable:
//! - model-based: EPS / (r - g)
//! - peer-based: EPS / (r_max - g) .. EPS / (r_min - g)
//! - analyst-based: P/E * EPS
//!
//! The peer bounds are inverted on purpose: the highest peer return gives
//! the lowest price.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A price range that may have lost one of its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PriceRange {
    /// Both bounds computed.
    Between {
        /// Price implied by the highest peer return
        low: f64,
        /// Price implied by the lowest peer return
        high: f64,
    },
    /// Only the lower bound could be computed.
    AtLeast(f64),
    /// Only the upper bound could be computed.
    AtMost(f64),
}

impl PriceRange {
    /// Combine independently computed bounds.
    pub const fn from_bounds(low: Option<f64>, high: Option<f64>) -> Option<Self> {
        match (low, high) {
            (Some(low), Some(high)) => Some(Self::Between { low, high }),
            (Some(low), None) => Some(Self::AtLeast(low)),
            (None, Some(high)) => Some(Self::AtMost(high)),
            (None, None) => None,
        }
    }

    /// Lower bound, if computed.
    pub const fn low(&self) -> Option<f64> {
        match self {
            Self::Between { low, .. } | Self::AtLeast(low) => Some(*low),
            Self::AtMost(_) => None,
        }
    }

    /// Upper bound, if computed.
    pub const fn high(&self) -> Option<f64> {
        match self {
            Self::Between { high, .. } | Self::AtMost(high) => Some(*high),
            Self::AtLeast(_) => None,
        }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Between { low, high } => write!(f, "{low:.2} - {high:.2}"),
            Self::AtLeast(low) => write!(f, "≥ {low:.2}"),
            Self::AtMost(high) => write!(f, "≤ {high:.2}"),
        }
    }
}

/// Inputs of a price forecast. Every field may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastInputs {
    /// Consensus forward EPS
    pub forward_eps: Option<f64>,
    /// Consensus forward P/E
    pub forward_pe: Option<f64>,
    /// Model-based expected return
    pub model_return: Option<f64>,
    /// Lowest peer expected return
    pub peer_min_return: Option<f64>,
    /// Highest peer expected return
    pub peer_max_return: Option<f64>,
}

/// The three price estimates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceForecast {
    /// Capitalized model-based return
    pub model_price: Option<f64>,
    /// Capitalized peer return range
    pub peer_price_range: Option<PriceRange>,
    /// Forward P/E times forward EPS
    pub analyst_price: Option<f64>,
}

impl PriceForecast {
    /// Whether none of the estimates could be computed.
    pub const fn is_empty(&self) -> bool {
        self.model_price.is_none() && self.peer_price_range.is_none() && self.analyst_price.is_none()
    }
}

/// Known operand: present, finite and non-zero.
fn known(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v != 0.0)
}

/// Converts return estimates into prices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceForecaster {
    terminal_growth: f64,
}

impl PriceForecaster {
    /// Create a forecaster with a terminal growth rate.
    pub const fn new(terminal_growth: f64) -> Self {
        Self { terminal_growth }
    }

    /// Terminal growth rate.
    pub const fn terminal_growth(&self) -> f64 {
        self.terminal_growth
    }

    /// `eps / (r - g)`, only when `r > g` strictly.
    pub fn capitalize(&self, eps: Option<f64>, expected_return: Option<f64>) -> Option<f64> {
        let eps = known(eps)?;
        let r = expected_return.filter(|r| r.is_finite())?;
        (r > self.terminal_growth).then(|| eps / (r - self.terminal_growth))
    }

    /// `P/E * EPS`, when both are known.
    pub fn analyst_price(&self, forward_pe: Option<f64>, forward_eps: Option<f64>) -> Option<f64> {
        Some(known(forward_pe)? * known(forward_eps)?)
    }

    /// Compute all three estimates independently.
    pub fn forecast_prices(&self, inputs: &ForecastInputs) -> PriceForecast {
        let eps = inputs.forward_eps;

        PriceForecast {
            model_price: self.capitalize(eps, inputs.model_return),
            peer_price_range: PriceRange::from_bounds(
                self.capitalize(eps, inputs.peer_max_return),
                self.capitalize(eps, inputs.peer_min_return),
            ),
            analyst_price: self.analyst_price(inputs.forward_pe, eps),
        }
    }
}
