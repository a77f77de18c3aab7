//! Currently listed companies.

use crate::error::{DataError, Result};
use crate::reference::normalize_ticker;
use std::collections::HashSet;
use std::io;
use std::path::Path;
use tracing::info;

/// Column holding the ticker symbols.
const TICKER_COLUMN: &str = "Ticker";

/// Set of tickers that are currently listed.
#[derive(Debug, Clone, Default)]
pub struct ActiveCompanies {
    tickers: HashSet<String>,
}

impl ActiveCompanies {
    /// Build the list from symbols already in memory.
    pub fn new<I, S>(tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tickers: tickers
                .into_iter()
                .map(|t| normalize_ticker(t.as_ref()))
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// Load the list from a CSV file with a `Ticker` column.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let list = Self::from_reader(std::fs::File::open(path)?)?;
        info!(path = %path.display(), tickers = list.len(), "loaded active companies");
        Ok(list)
    }

    /// Load the list from any CSV source.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let index = csv_reader
            .headers()?
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(TICKER_COLUMN))
            .ok_or_else(|| {
                DataError::Parse(format!("active companies list has no {TICKER_COLUMN} column"))
            })?;

        let mut tickers = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            if let Some(value) = record.get(index) {
                tickers.push(value.to_string());
            }
        }

        Ok(Self::new(tickers))
    }

    /// Whether the ticker is currently listed.
    pub fn contains(&self, ticker: &str) -> bool {
        self.tickers.contains(&normalize_ticker(ticker))
    }

    /// Number of listed tickers.
    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}
