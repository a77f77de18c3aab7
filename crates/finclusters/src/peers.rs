//! Cluster Resolver.
//!
//! Maps a ticker to its sector, its most recent cluster and the active
//! companies that share that cluster.

use crate::error::Result;
use finclusters_data::{DataError, GicsSector, ReferenceStore, SectorCode, Table, normalize_ticker};
use finclusters_output::PeerRecord;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Reference-table view of one ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerRecord {
    /// Ticker symbol (uppercase)
    pub ticker: String,
    /// GICS sector from the sector map
    pub sector: GicsSector,
    /// Cluster id within the sector
    pub cluster_id: i64,
    /// Fiscal year of the clustering financials
    pub fiscal_year: i32,
    /// Whether the ticker is on the active-companies list
    pub active: bool,
}

/// A ticker and its cluster peers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerSet {
    /// The queried ticker
    pub subject: TickerRecord,
    /// Active peers, alphabetical, never including the subject
    pub peers: Vec<String>,
}

impl PeerSet {
    /// Whether no active peer remains.
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// One export row per peer.
    pub fn records(&self) -> Vec<PeerRecord> {
        self.peers
            .iter()
            .map(|peer| PeerRecord {
                subject: self.subject.ticker.clone(),
                peer: peer.clone(),
                sector: Some(self.subject.sector),
                cluster: Some(self.subject.cluster_id),
            })
            .collect()
    }
}

/// Resolves peers from the reference tables.
#[derive(Debug, Clone, Copy)]
pub struct ClusterResolver<'a> {
    store: &'a ReferenceStore,
}

impl<'a> ClusterResolver<'a> {
    /// Create a resolver over a reference store.
    pub const fn new(store: &'a ReferenceStore) -> Self {
        Self { store }
    }

    /// Sector of a ticker from the sector map.
    ///
    /// # Errors
    /// - `InvalidSymbol` for an empty ticker
    /// - `NotFound` when the ticker is not in the sector map
    /// - `UnsupportedSector` when the sector code is not a GICS sector
    pub fn sector(&self, ticker: &str) -> Result<GicsSector> {
        let ticker = checked_ticker(ticker)?;
        match self.store.coefficients().sector(&ticker)? {
            SectorCode::Gics(sector) => Ok(*sector),
            SectorCode::Unsupported(raw) => Err(DataError::UnsupportedSector(raw.clone()).into()),
        }
    }

    /// Sector-map entry of a ticker, `None` when its code is not a GICS
    /// sector.
    ///
    /// # Errors
    /// - `InvalidSymbol` for an empty ticker
    /// - `NotFound` when the ticker is not in the sector map
    pub fn mapped_sector(&self, ticker: &str) -> Result<Option<GicsSector>> {
        let ticker = checked_ticker(ticker)?;
        Ok(self.store.coefficients().sector(&ticker)?.gics())
    }

    /// Resolve a ticker's cluster peers.
    ///
    /// # Errors
    /// - `InvalidSymbol` for an empty ticker
    /// - `NotFound` when the ticker is missing from the sector map or from its
    ///   sector's membership table
    /// - `UnsupportedSector` when the sector has no membership table
    pub fn resolve_peers(&self, ticker: &str) -> Result<PeerSet> {
        let ticker = checked_ticker(ticker)?;
        let sector = self.sector(&ticker)?;
        let membership = self.store.membership(sector)?;

        let latest = membership.latest(&ticker).ok_or_else(|| DataError::NotFound {
            table: Table::Membership,
            ticker: ticker.clone(),
        })?;

        let active = self.store.active();
        let subject = TickerRecord {
            ticker: ticker.clone(),
            sector,
            cluster_id: latest.cluster,
            fiscal_year: latest.fiscal_year,
            active: active.contains(&ticker),
        };

        let members = membership.current_members(subject.cluster_id);
        let total = members.len();
        let peers: Vec<String> = members
            .into_iter()
            .filter(|m| m.ticker != ticker)
            .filter(|m| active.contains(&m.ticker))
            .map(|m| m.ticker.clone())
            .collect();

        debug!(%ticker, members = total, active_peers = peers.len(), "cluster filtered");
        info!(
            %ticker,
            sector = %sector.table_key(),
            cluster = subject.cluster_id,
            fiscal_year = subject.fiscal_year,
            peers = peers.len(),
            "resolved peers"
        );

        Ok(PeerSet { subject, peers })
    }

    /// PCA projection of the ticker's sector with the ticker's rows flagged
    /// in a `selected` column.
    pub fn projection(&self, ticker: &str) -> Result<DataFrame> {
        let ticker = checked_ticker(ticker)?;
        let sector = self.sector(&ticker)?;
        let membership = self.store.membership(sector)?;
        Ok(membership.projection_frame(&ticker)?)
    }
}

fn checked_ticker(ticker: &str) -> Result<String> {
    let ticker = normalize_ticker(ticker);
    if ticker.is_empty() {
        return Err(DataError::InvalidSymbol("ticker must not be empty".to_string()).into());
    }
    Ok(ticker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use finclusters_data::{ActiveCompanies, ClusterMembership, CoefficientTable, ErrorKind};

    const COEFFICIENTS: &str = "\
ticker,sector,cluster,model,intercept,coef_1,coef_2,coef_3,coef_4
AAPL,GICS_45,2,CAPM,0.0021,1.12,,,
MSFT,GICS_45,2,CAPM,0.0010,0.90,,,
NVDA,GICS_45,2,CAPM,0.0040,1.70,,,
ORCL,GICS_45,2,CAPM,0.0005,0.80,,,
XOM,GICS_10,1,CAPM,0.0010,0.70,,,
LONE,GICS_45,9,CAPM,0.0010,1.00,,,
GHOST,GICS_45,2,CAPM,0.0010,1.00,,,
ODD,SECTOR_X,1,CAPM,0.0010,1.00,,,
";

    const MEMBERSHIP: &str = "\
tic,fyear,cluster,pca_1,pca_2
AAPL,2022,1,0.1,0.1
AAPL,2023,2,0.2,0.2
MSFT,2023,2,0.3,0.3
NVDA,2021,2,0.4,0.4
NVDA,2023,3,0.5,0.5
ORCL,2023,2,0.6,0.6
DELL,2023,2,0.7,0.7
LONE,2023,9,0.8,0.8
";

    fn store() -> ReferenceStore {
        let coefficients = CoefficientTable::from_reader(COEFFICIENTS.as_bytes()).unwrap();
        let active = ActiveCompanies::new(["AAPL", "MSFT", "NVDA", "DELL", "LONE"]);
        let membership = ClusterMembership::from_reader(
            GicsSector::InformationTechnology,
            MEMBERSHIP.as_bytes(),
        )
        .unwrap();
        ReferenceStore::new(coefficients, active).with_membership(membership)
    }

    #[test]
    fn test_resolve_peers() {
        let store = store();
        let resolver = ClusterResolver::new(&store);

        let set = resolver.resolve_peers(" aapl ").unwrap();
        assert_eq!(set.subject.ticker, "AAPL");
        assert_eq!(set.subject.sector, GicsSector::InformationTechnology);
        assert_eq!(set.subject.cluster_id, 2);
        assert_eq!(set.subject.fiscal_year, 2023);
        assert!(set.subject.active);

        // NVDA's cluster-2 row is older but still its latest row in that
        // cluster; ORCL is inactive.
        assert_eq!(set.peers, vec!["DELL", "MSFT", "NVDA"]);

        let records = set.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].subject, "AAPL");
        assert_eq!(records[0].peer, "DELL");
        assert_eq!(records[0].cluster, Some(2));
    }

    #[test]
    fn test_peers_exclude_subject_and_inactive() {
        let store = store();
        let set = ClusterResolver::new(&store).resolve_peers("MSFT").unwrap();
        assert!(!set.peers.contains(&"MSFT".to_string()));
        assert!(!set.peers.contains(&"ORCL".to_string()));
    }

    #[test]
    fn test_empty_cluster() {
        let store = store();
        let set = ClusterResolver::new(&store).resolve_peers("LONE").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_errors() {
        let store = store();
        let resolver = ClusterResolver::new(&store);

        let err = resolver.resolve_peers("   ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = resolver.resolve_peers("ZZZZ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        // In the sector map but not in the membership table.
        let err = resolver.resolve_peers("GHOST").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        // Energy has no membership table configured.
        let err = resolver.resolve_peers("XOM").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);

        let err = resolver.resolve_peers("ODD").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_mapped_sector() {
        let store = store();
        let resolver = ClusterResolver::new(&store);

        assert_eq!(
            resolver.mapped_sector("xom").unwrap(),
            Some(GicsSector::Energy)
        );
        // Not a GICS code, but still in the sector map.
        assert_eq!(resolver.mapped_sector("ODD").unwrap(), None);

        let err = resolver.mapped_sector("ZZZZ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = resolver.mapped_sector("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let store = store();
        let resolver = ClusterResolver::new(&store);
        assert_eq!(
            resolver.resolve_peers("AAPL").unwrap(),
            resolver.resolve_peers("AAPL").unwrap()
        );
    }

    #[test]
    fn test_projection() {
        let store = store();
        let frame = ClusterResolver::new(&store).projection("AAPL").unwrap();
        assert_eq!(frame.height(), 8);

        let selected = frame.column("selected").unwrap().bool().unwrap();
        let flagged = selected.into_iter().filter(|v| *v == Some(true)).count();
        assert_eq!(flagged, 2);
    }
}
