//! Sector-specific cluster membership tables.
//!
//! Each supported sector has one table with a row per (ticker, fiscal year),
//! the cluster assignment of that year and the 2-D PCA projection used for
//! visualization. Feature columns are ignored.

use crate::error::{DataError, Result};
use crate::reference::normalize_ticker;
use crate::sector::GicsSector;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io;
use std::path::Path;
use tracing::info;

/// Raw CSV row. Integral columns are often written as floats.
#[derive(Debug, Deserialize)]
struct MembershipRow {
    tic: String,
    fyear: f64,
    cluster: f64,
    #[serde(default)]
    pca_1: Option<f64>,
    #[serde(default)]
    pca_2: Option<f64>,
}

/// One (ticker, fiscal year) cluster assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipEntry {
    /// Ticker symbol (uppercase).
    pub ticker: String,
    /// Fiscal year of the financials behind the assignment.
    pub fiscal_year: i32,
    /// Sector-scoped cluster id.
    pub cluster: i64,
    /// First PCA coordinate.
    pub pca_1: Option<f64>,
    /// Second PCA coordinate.
    pub pca_2: Option<f64>,
}

fn integral(value: f64, column: &str, ticker: &str) -> Result<i64> {
    if value.is_finite() && value.fract() == 0.0 {
        Ok(value as i64)
    } else {
        Err(DataError::Parse(format!(
            "column {column} for {ticker} is not an integer: {value}"
        )))
    }
}

/// Cluster membership table for one sector.
#[derive(Debug, Clone)]
pub struct ClusterMembership {
    sector: GicsSector,
    entries: Vec<MembershipEntry>,
}

impl ClusterMembership {
    /// Build a table from entries already in memory.
    pub const fn new(sector: GicsSector, entries: Vec<MembershipEntry>) -> Self {
        Self { sector, entries }
    }

    /// Load a sector table from a CSV file.
    pub fn from_path(sector: GicsSector, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let table = Self::from_reader(sector, std::fs::File::open(path)?)?;
        info!(
            sector = %sector.table_key(),
            path = %path.display(),
            rows = table.len(),
            "loaded cluster membership table"
        );
        Ok(table)
    }

    /// Load a sector table from any CSV source.
    pub fn from_reader<R: io::Read>(sector: GicsSector, reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut entries = Vec::new();

        for record in csv_reader.deserialize::<MembershipRow>() {
            let row = record?;
            let ticker = normalize_ticker(&row.tic);
            if ticker.is_empty() {
                continue;
            }
            let fiscal_year = i32::try_from(integral(row.fyear, "fyear", &ticker)?)
                .map_err(|_| {
                    DataError::Parse(format!("column fyear for {ticker} is out of range: {}", row.fyear))
                })?;
            let cluster = integral(row.cluster, "cluster", &ticker)?;
            entries.push(MembershipEntry {
                ticker,
                fiscal_year,
                cluster,
                pca_1: row.pca_1.filter(|v| !v.is_nan()),
                pca_2: row.pca_2.filter(|v| !v.is_nan()),
            });
        }

        Ok(Self { sector, entries })
    }

    /// Sector the table belongs to.
    pub const fn sector(&self) -> GicsSector {
        self.sector
    }

    /// All rows in file order.
    pub fn entries(&self) -> &[MembershipEntry] {
        &self.entries
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the ticker appears in any year.
    pub fn contains(&self, ticker: &str) -> bool {
        let ticker = normalize_ticker(ticker);
        self.entries.iter().any(|e| e.ticker == ticker)
    }

    /// The ticker's most recent row. Ties keep the first row in file order.
    pub fn latest(&self, ticker: &str) -> Option<&MembershipEntry> {
        let ticker = normalize_ticker(ticker);
        self.entries
            .iter()
            .filter(|e| e.ticker == ticker)
            .fold(None, |best: Option<&MembershipEntry>, e| match best {
                Some(b) if b.fiscal_year >= e.fiscal_year => Some(b),
                _ => Some(e),
            })
    }

    /// Current members of a cluster: one row per ticker, the most recent
    /// fiscal year among that ticker's rows in the cluster, sorted by ticker.
    pub fn current_members(&self, cluster: i64) -> Vec<&MembershipEntry> {
        let mut rows: Vec<&MembershipEntry> =
            self.entries.iter().filter(|e| e.cluster == cluster).collect();
        // Stable sort: equal years keep file order, so the first one wins.
        rows.sort_by(|a, b| b.fiscal_year.cmp(&a.fiscal_year));

        let mut seen = HashSet::new();
        let mut members: Vec<&MembershipEntry> = rows
            .into_iter()
            .filter(|e| seen.insert(e.ticker.as_str()))
            .collect();
        members.sort_by(|a, b| a.ticker.cmp(&b.ticker));
        members
    }

    /// Distinct cluster ids, ascending.
    pub fn clusters(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.entries.iter().map(|e| e.cluster).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Convert the table to a Polars DataFrame.
    ///
    /// Columns: tic, fyear, cluster, pca_1, pca_2
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let tickers: Vec<&str> = self.entries.iter().map(|e| e.ticker.as_str()).collect();
        let years: Vec<i32> = self.entries.iter().map(|e| e.fiscal_year).collect();
        let clusters: Vec<i64> = self.entries.iter().map(|e| e.cluster).collect();
        let pca_1: Vec<Option<f64>> = self.entries.iter().map(|e| e.pca_1).collect();
        let pca_2: Vec<Option<f64>> = self.entries.iter().map(|e| e.pca_2).collect();

        let df = DataFrame::new(vec![
            Series::new("tic".into(), tickers).into(),
            Series::new("fyear".into(), years).into(),
            Series::new("cluster".into(), clusters).into(),
            Series::new("pca_1".into(), pca_1).into(),
            Series::new("pca_2".into(), pca_2).into(),
        ])?;

        Ok(df)
    }

    /// PCA projection of the whole sector with the subject's rows flagged.
    ///
    /// Columns: tic, fyear, cluster, pca_1, pca_2, selected
    pub fn projection_frame(&self, subject: &str) -> Result<DataFrame> {
        let subject = normalize_ticker(subject);
        let df = self
            .to_dataframe()?
            .lazy()
            .with_column(
                when(col("tic").eq(lit(subject.as_str())))
                    .then(lit(true))
                    .otherwise(lit(false))
                    .alias("selected"),
            )
            .collect()?;

        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
tic,fyear,cluster,pca_1,pca_2,ROA,ROE
AAPL,2022.0,2,0.5,1.5,0.2,0.4
AAPL,2023.0,2,0.6,1.4,0.2,0.4
MSFT,2021,2,0.1,0.2,0.1,0.3
MSFT,2023,1,0.3,0.2,0.1,0.3
NVDA,2023,2,-0.4,0.9,0.3,0.5
NVDA,2023,2,-0.5,0.8,0.3,0.5
ORCL,2020,3,,,0.1,0.1
";

    fn table() -> ClusterMembership {
        ClusterMembership::from_reader(GicsSector::InformationTechnology, CSV.as_bytes()).unwrap()
    }

    #[test]
    fn test_load() {
        let table = table();
        assert_eq!(table.len(), 7);
        assert_eq!(table.sector(), GicsSector::InformationTechnology);
        assert_eq!(table.clusters(), vec![1, 2, 3]);
        assert!(table.contains("aapl"));
        assert!(!table.contains("IBM"));
    }

    #[test]
    fn test_latest_row() {
        let table = table();
        let latest = table.latest("AAPL").unwrap();
        assert_eq!(latest.fiscal_year, 2023);
        assert_eq!(latest.pca_1, Some(0.6));

        let msft = table.latest("MSFT").unwrap();
        assert_eq!(msft.cluster, 1);
    }

    #[test]
    fn test_current_members_dedup_and_order() {
        let table = table();
        let members = table.current_members(2);
        let tickers: Vec<&str> = members.iter().map(|e| e.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["AAPL", "MSFT", "NVDA"]);

        assert_eq!(members[0].fiscal_year, 2023);
        // Equal years keep the first row in file order.
        assert_eq!(members[2].pca_1, Some(-0.4));
    }

    #[test]
    fn test_non_integral_year_rejected() {
        let csv = "tic,fyear,cluster,pca_1,pca_2\nAAPL,2023.5,2,0,0\n";
        let result = ClusterMembership::from_reader(GicsSector::HealthCare, csv.as_bytes());
        assert!(matches!(result, Err(DataError::Parse(_))));
    }

    #[test]
    fn test_out_of_range_year_rejected() {
        let csv = "tic,fyear,cluster,pca_1,pca_2\nAAPL,3000000000.0,2,0,0\n";
        let result = ClusterMembership::from_reader(GicsSector::HealthCare, csv.as_bytes());
        assert!(matches!(result, Err(DataError::Parse(msg)) if msg.contains("out of range")));
    }

    #[test]
    fn test_projection_frame() {
        let df = table().projection_frame("nvda").unwrap();
        assert_eq!(df.height(), 7);
        assert_eq!(
            df.get_column_names(),
            vec!["tic", "fyear", "cluster", "pca_1", "pca_2", "selected"]
        );
        let selected = df.column("selected").unwrap().bool().unwrap();
        assert_eq!(selected.sum(), Some(2));
    }
}
