//! Per-ticker sector and model coefficient table.
//!
//! The table doubles as the ticker to sector map: every row carries the
//! ticker's GICS sector key alongside the model family and coefficients.

use crate::error::{DataError, Result, Table};
use crate::model::{MAX_FACTORS, ModelFamily, SectorModelSpec};
use crate::reference::normalize_ticker;
use crate::sector::SectorCode;
use serde::Deserialize;
use std::collections::HashMap;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

/// Raw CSV row.
#[derive(Debug, Deserialize)]
struct CoefficientRow {
    ticker: String,
    sector: String,
    #[serde(default)]
    cluster: Option<f64>,
    model: String,
    intercept: f64,
    #[serde(default)]
    coef_1: Option<f64>,
    #[serde(default)]
    coef_2: Option<f64>,
    #[serde(default)]
    coef_3: Option<f64>,
    #[serde(default)]
    coef_4: Option<f64>,
}

/// Why a coefficient row was not accepted as a [`SectorModelSpec`].
#[derive(Debug, Clone, PartialEq)]
enum Rejection {
    UnknownModel(String),
    Inconsistent {
        family: ModelFamily,
        expected: usize,
        found: usize,
    },
    Malformed(String),
}

impl Rejection {
    fn from_error(err: DataError) -> Self {
        match err {
            DataError::ModelConsistency {
                family,
                expected,
                found,
                ..
            } => Self::Inconsistent {
                family,
                expected,
                found,
            },
            other => Self::Malformed(other.to_string()),
        }
    }

    fn to_error(&self, ticker: &str) -> DataError {
        match self {
            Self::UnknownModel(label) => DataError::UnknownModel {
                ticker: ticker.to_string(),
                label: label.clone(),
            },
            Self::Inconsistent {
                family,
                expected,
                found,
            } => DataError::ModelConsistency {
                ticker: ticker.to_string(),
                family: *family,
                expected: *expected,
                found: *found,
            },
            Self::Malformed(reason) => DataError::Parse(reason.clone()),
        }
    }
}

/// One ticker's row after ingestion.
#[derive(Debug, Clone)]
pub struct TickerEntry {
    ticker: String,
    sector: SectorCode,
    cluster: Option<i64>,
    model: std::result::Result<SectorModelSpec, Rejection>,
}

impl TickerEntry {
    /// Ticker symbol (uppercase).
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Sector code of the ticker.
    pub const fn sector(&self) -> &SectorCode {
        &self.sector
    }

    /// Cluster id recorded alongside the coefficients, if any.
    pub const fn cluster(&self) -> Option<i64> {
        self.cluster
    }

    /// The validated model spec, or the reason the row was rejected.
    pub fn model(&self) -> Result<&SectorModelSpec> {
        self.model.as_ref().map_err(|r| r.to_error(&self.ticker))
    }
}

/// Ticker to sector map and sector model coefficients.
#[derive(Debug, Clone, Default)]
pub struct CoefficientTable {
    entries: HashMap<String, TickerEntry>,
}

impl CoefficientTable {
    /// Load the table from a CSV file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let table = Self::from_reader(std::fs::File::open(path)?)?;
        info!(
            path = %path.display(),
            tickers = table.len(),
            rejected = table.rejected_count(),
            "loaded coefficient table"
        );
        Ok(table)
    }

    /// Load the table from any CSV source.
    ///
    /// Duplicate tickers keep their first row.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut entries = HashMap::new();

        for record in csv_reader.deserialize::<CoefficientRow>() {
            let row = record?;
            let ticker = normalize_ticker(&row.ticker);
            if ticker.is_empty() {
                continue;
            }
            if entries.contains_key(&ticker) {
                debug!(%ticker, "duplicate coefficient row ignored");
                continue;
            }

            let entry = Self::ingest(ticker.clone(), row);
            if let Err(rejection) = &entry.model {
                warn!(%ticker, ?rejection, "coefficient row rejected");
            }
            entries.insert(ticker, entry);
        }

        Ok(Self { entries })
    }

    fn ingest(ticker: String, row: CoefficientRow) -> TickerEntry {
        let coefficients: [Option<f64>; MAX_FACTORS] =
            [row.coef_1, row.coef_2, row.coef_3, row.coef_4];

        let model = ModelFamily::from_label(&row.model)
            .ok_or_else(|| Rejection::UnknownModel(row.model.trim().to_string()))
            .and_then(|family| {
                SectorModelSpec::from_coefficients(&ticker, family, row.intercept, coefficients)
                    .map_err(Rejection::from_error)
            });

        TickerEntry {
            sector: SectorCode::parse(&row.sector),
            cluster: row.cluster.filter(|c| c.is_finite()).map(|c| c as i64),
            model,
            ticker,
        }
    }

    /// Full entry for a ticker.
    pub fn entry(&self, ticker: &str) -> Option<&TickerEntry> {
        self.entries.get(&normalize_ticker(ticker))
    }

    /// Sector of a ticker.
    pub fn sector(&self, ticker: &str) -> Result<&SectorCode> {
        self.entry(ticker)
            .map(TickerEntry::sector)
            .ok_or_else(|| DataError::not_found(Table::SectorMap, ticker))
    }

    /// Validated model spec of a ticker.
    ///
    /// Rows rejected at load time surface their rejection here.
    pub fn model_spec(&self, ticker: &str) -> Result<&SectorModelSpec> {
        self.entry(ticker)
            .ok_or_else(|| DataError::not_found(Table::Coefficients, ticker))?
            .model()
    }

    /// Whether the ticker has a row.
    pub fn contains(&self, ticker: &str) -> bool {
        self.entry(ticker).is_some()
    }

    /// All tickers, sorted.
    pub fn tickers(&self) -> Vec<String> {
        let mut tickers: Vec<String> = self.entries.keys().cloned().collect();
        tickers.sort();
        tickers
    }

    /// Number of tickers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of rows whose model spec was rejected.
    pub fn rejected_count(&self) -> usize {
        self.entries.values().filter(|e| e.model.is_err()).count()
    }
}
