//! Read-only access to the reference tables.

use crate::error::{DataError, Result};
use crate::reference::{ActiveCompanies, ClusterMembership, CoefficientTable};
use crate::sector::{GicsSector, SectorCode};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Locations of the reference tables.
///
/// Relative file names are resolved against `data_dir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// Directory holding the tables.
    pub data_dir: PathBuf,
    /// Per-ticker sector and coefficient table.
    pub coefficients: PathBuf,
    /// Active companies list.
    pub active_companies: PathBuf,
    /// Cluster membership table per sector key (`GICS_NN`).
    pub membership: BTreeMap<String, PathBuf>,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        let membership = [
            ("GICS_25", "clustered_data_cd.csv"),
            ("GICS_35", "clustered_data_hc.csv"),
            ("GICS_45", "clustered_data_it.csv"),
        ]
        .into_iter()
        .map(|(key, file)| (key.to_string(), PathBuf::from(file)))
        .collect();

        Self {
            data_dir: PathBuf::from("data"),
            coefficients: PathBuf::from("sector_model_coefficients_by_ticker.csv"),
            active_companies: PathBuf::from("Active_Companies.csv"),
            membership,
        }
    }
}

impl ReferenceConfig {
    /// Resolve a table path against the data directory.
    pub fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.data_dir.join(file)
        }
    }

    /// Membership table paths keyed by sector.
    ///
    /// Keys that do not name a GICS sector are rejected.
    pub fn membership_paths(&self) -> Result<HashMap<GicsSector, PathBuf>> {
        self.membership
            .iter()
            .map(|(key, file)| match SectorCode::parse(key) {
                SectorCode::Gics(sector) => Ok((sector, self.resolve(file))),
                SectorCode::Unsupported(raw) => Err(DataError::UnsupportedSector(raw)),
            })
            .collect()
    }
}

/// Reference data: coefficient table, active companies and lazily loaded
/// per-sector membership tables.
///
/// Membership tables are loaded at most once per sector for the lifetime of
/// the store.
#[derive(Debug)]
pub struct ReferenceStore {
    coefficients: CoefficientTable,
    active: ActiveCompanies,
    sources: HashMap<GicsSector, PathBuf>,
    cache: Mutex<HashMap<GicsSector, Arc<ClusterMembership>>>,
}

impl ReferenceStore {
    /// Create a store without any membership tables.
    pub fn new(coefficients: CoefficientTable, active: ActiveCompanies) -> Self {
        Self {
            coefficients,
            active,
            sources: HashMap::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Load the coefficient table and active list named by `config`.
    ///
    /// Membership tables are only read when first needed.
    pub fn load(config: &ReferenceConfig) -> Result<Self> {
        let coefficients = CoefficientTable::from_path(config.resolve(&config.coefficients))?;
        let active = ActiveCompanies::from_path(config.resolve(&config.active_companies))?;
        let sources = config.membership_paths()?;

        Ok(Self {
            sources,
            ..Self::new(coefficients, active)
        })
    }

    /// Register a membership table file for a sector.
    pub fn with_membership_path(mut self, sector: GicsSector, path: impl Into<PathBuf>) -> Self {
        self.sources.insert(sector, path.into());
        self
    }

    /// Register an already loaded membership table.
    pub fn with_membership(self, table: ClusterMembership) -> Self {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(table.sector(), Arc::new(table));
        }
        self
    }

    /// The coefficient table (also the ticker to sector map).
    pub const fn coefficients(&self) -> &CoefficientTable {
        &self.coefficients
    }

    /// The active companies list.
    pub const fn active(&self) -> &ActiveCompanies {
        &self.active
    }

    /// Sectors with a membership table, sorted by code.
    pub fn supported_sectors(&self) -> Vec<GicsSector> {
        let mut sectors: Vec<GicsSector> = self.sources.keys().copied().collect();
        if let Ok(cache) = self.cache.lock() {
            sectors.extend(cache.keys().copied());
        }
        sectors.sort();
        sectors.dedup();
        sectors
    }

    /// Sectors whose membership table is currently cached.
    pub fn loaded_sectors(&self) -> Vec<GicsSector> {
        let mut sectors: Vec<GicsSector> = self
            .cache
            .lock()
            .map(|cache| cache.keys().copied().collect())
            .unwrap_or_default();
        sectors.sort();
        sectors
    }

    /// Membership table of a sector, loading it on first use.
    pub fn membership(&self, sector: GicsSector) -> Result<Arc<ClusterMembership>> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|e| DataError::Cache(e.to_string()))?;

        if let Some(table) = cache.get(&sector) {
            debug!(sector = %sector.table_key(), "membership cache hit");
            return Ok(Arc::clone(table));
        }

        let path = self
            .sources
            .get(&sector)
            .ok_or_else(|| DataError::UnsupportedSector(sector.table_key()))?;
        let table = Arc::new(ClusterMembership::from_path(sector, path)?);
        cache.insert(sector, Arc::clone(&table));

        Ok(table)
    }
}
