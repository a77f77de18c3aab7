//! Error types for the dashboard pipeline.

use finclusters_data::{DataError, ErrorKind};
use finclusters_models::ModelError;
use finclusters_output::{ExportError, ReportError};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while running the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Reference or market data error
    #[error(transparent)]
    Data(#[from] DataError),

    /// Estimation error
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Report error
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Export error
    #[error(transparent)]
    Export(#[from] ExportError),

    /// The session has no ticker selected
    #[error("No ticker selected")]
    NoTicker,

    /// Configuration file could not be read
    #[error("Failed to load configuration from {path}: {reason}")]
    Config {
        /// File that was read
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },
}

impl PipelineError {
    /// Classify the error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Data(e) => e.kind(),
            Self::Model(e) => e.kind(),
            Self::Report(_) | Self::Export(_) => ErrorKind::External,
            Self::NoTicker => ErrorKind::InvalidInput,
            Self::Config { .. } => ErrorKind::Config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finclusters_data::Table;

    #[test]
    fn test_kind_passes_through() {
        let err = PipelineError::from(DataError::NotFound {
            table: Table::SectorMap,
            ticker: "ZZZZ".to_string(),
        });
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "ZZZZ not found in sector map");

        let err = PipelineError::from(ModelError::UnknownScenario("bullish".to_string()));
        assert_eq!(err.kind(), ErrorKind::Config);

        assert_eq!(PipelineError::NoTicker.kind(), ErrorKind::InvalidInput);
    }
}
