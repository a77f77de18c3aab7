//! CSV and JSON export of peer lists and dashboard estimates.

use crate::report::DashboardReport;
use finclusters_data::GicsSector;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writer produced invalid UTF-8.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    #[default]
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }

    /// Infer the format from a file extension; JSON files are pretty-printed.
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ExportError::InvalidFormat(path.display().to_string()))?;
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty" | "pretty-json" | "pretty_json" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// One peer of the subject ticker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeerRecord {
    /// Subject ticker.
    pub subject: String,

    /// Peer ticker.
    pub peer: String,

    /// Sector shared by subject and peer.
    pub sector: Option<GicsSector>,

    /// Cluster shared by subject and peer.
    pub cluster: Option<i64>,
}

/// One estimation method of the dashboard, flattened for CSV.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EstimateRecord {
    /// Ticker symbol.
    pub ticker: String,

    /// `model`, `peer_min`, `peer_max` or `analyst`.
    pub method: String,

    /// Expected monthly return, empty when unavailable.
    pub expected_return: Option<f64>,

    /// Implied price, empty when unavailable.
    pub price: Option<f64>,
}

impl DashboardReport {
    /// Peer list as export records.
    pub fn peer_records(&self) -> Vec<PeerRecord> {
        self.peers
            .iter()
            .map(|peer| PeerRecord {
                subject: self.ticker.clone(),
                peer: peer.clone(),
                sector: self.company.sector,
                cluster: self.company.cluster,
            })
            .collect()
    }

    /// Return and price estimates, one row per method.
    ///
    /// The peer price bounds are paired with the returns that produced them:
    /// the lowest return gives the highest price.
    pub fn estimate_records(&self) -> Vec<EstimateRecord> {
        let range = self.forecast.peer_price_range;
        let row = |method: &str, expected_return: Option<f64>, price: Option<f64>| EstimateRecord {
            ticker: self.ticker.clone(),
            method: method.to_string(),
            expected_return,
            price,
        };

        vec![
            row(
                "model",
                self.expected_return.as_ref().map(|r| r.point),
                self.forecast.model_price,
            ),
            row(
                "peer_min",
                self.peer_returns.as_ref().map(|r| r.min),
                range.and_then(|r| r.high()),
            ),
            row(
                "peer_max",
                self.peer_returns.as_ref().map(|r| r.max),
                range.and_then(|r| r.low()),
            ),
            row("analyst", self.analyst_return, self.forecast.analyst_price),
        ]
    }
}

fn write_csv<T: Serialize>(records: &[T]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in records {
        wtr.serialize(record)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

impl Exporter for Vec<PeerRecord> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv(self),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for DashboardReport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv(&self.estimate_records()),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}
