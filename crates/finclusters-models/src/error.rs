//! Error types for return estimation.

use finclusters_data::{DataError, ErrorKind, ModelFamily};
use thiserror::Error;

use crate::premium::PremiumScenario;

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors that can occur while estimating returns.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Reference data lookup failed
    #[error(transparent)]
    Data(#[from] DataError),

    /// Scenario name not recognized
    #[error("Unknown premium scenario '{0}' (expected 'historical' or 'forward_looking')")]
    UnknownScenario(String),

    /// Scenario cannot be used with the model family
    #[error("Premium scenario {scenario} does not apply to {family} models")]
    ScenarioNotApplicable {
        /// Requested scenario
        scenario: PremiumScenario,
        /// Model family of the ticker
        family: ModelFamily,
    },

    /// Premium vector and betas have different lengths
    #[error("{ticker} has {betas} betas but the premium vector has {premiums} entries")]
    DimensionMismatch {
        /// Ticker being evaluated
        ticker: String,
        /// Number of betas
        betas: usize,
        /// Number of premiums
        premiums: usize,
    },

    /// Numeric input outside its domain
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ModelError {
    /// Classify the error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Data(e) => e.kind(),
            Self::UnknownScenario(_) | Self::ScenarioNotApplicable { .. } => ErrorKind::Config,
            Self::DimensionMismatch { .. } => ErrorKind::ModelConsistency,
            Self::InvalidParameter(_) => ErrorKind::InvalidInput,
        }
    }
}
