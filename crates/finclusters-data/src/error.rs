//! Error types for data operations.

use crate::model::ModelFamily;
use std::fmt;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Coarse classification shared by every error in the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A ticker is absent from a required reference table.
    NotFound,
    /// Unrecognized scenario, model label or unsupported sector.
    Config,
    /// Stored coefficients disagree with the model family.
    ModelConsistency,
    /// The caller supplied malformed input.
    InvalidInput,
    /// Network, filesystem or parsing failure in an external collaborator.
    External,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "not found",
            Self::Config => "configuration error",
            Self::ModelConsistency => "model consistency error",
            Self::InvalidInput => "invalid input",
            Self::External => "external error",
        };
        f.write_str(label)
    }
}

/// Reference tables that can be searched for a ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// Ticker to sector map (the coefficient table).
    SectorMap,
    /// Per-ticker model coefficients.
    Coefficients,
    /// Sector-specific cluster membership table.
    Membership,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::SectorMap => "sector map",
            Self::Coefficients => "coefficient table",
            Self::Membership => "cluster membership table",
        };
        f.write_str(label)
    }
}

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// Ticker absent from a reference table
    #[error("{ticker} not found in {table}")]
    NotFound {
        /// Table that was searched
        table: Table,
        /// Ticker that was queried
        ticker: String,
    },

    /// Sector has no cluster membership table configured
    #[error("No cluster model is configured for sector {0}")]
    UnsupportedSector(String),

    /// Model label not recognized
    #[error("Unknown model family '{label}' for {ticker}")]
    UnknownModel {
        /// Ticker whose row carried the label
        ticker: String,
        /// The unrecognized label
        label: String,
    },

    /// Coefficient count disagrees with the model family
    #[error(
        "Coefficient row for {ticker} is inconsistent: {family} expects {expected} coefficients, found {found}"
    )]
    ModelConsistency {
        /// Ticker whose row is inconsistent
        ticker: String,
        /// Model family stored in the row
        family: ModelFamily,
        /// Factor count of the family
        expected: usize,
        /// Coefficients actually present
        found: usize,
    },

    /// Yahoo Finance API error
    #[error("Yahoo Finance API error: {0}")]
    YahooApi(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// Missing data
    #[error("Missing data for {symbol}: {reason}")]
    MissingData {
        /// Symbol that was queried
        symbol: String,
        /// Reason for missing data
        reason: String,
    },

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Time conversion error
    #[error("Time conversion error: {0}")]
    TimeConversion(String),

    /// Invalid symbol
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Cache error
    #[error("Cache error: {0}")]
    Cache(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    /// Classify the error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::UnsupportedSector(_) | Self::UnknownModel { .. } => ErrorKind::Config,
            Self::ModelConsistency { .. } => ErrorKind::ModelConsistency,
            Self::InvalidSymbol(_) => ErrorKind::InvalidInput,
            _ => ErrorKind::External,
        }
    }

    pub(crate) fn not_found(table: Table, ticker: &str) -> Self {
        Self::NotFound {
            table,
            ticker: ticker.to_string(),
        }
    }
}

impl From<yahoo_finance_api::YahooError> for DataError {
    fn from(err: yahoo_finance_api::YahooError) -> Self {
        Self::YahooApi(err.to_string())
    }
}
