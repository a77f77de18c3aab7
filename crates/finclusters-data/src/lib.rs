#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/finclusters/finclusters/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod market;
pub mod model;
pub mod reference;
pub mod sector;
pub mod yahoo;

pub use error::{DataError, ErrorKind, Result, Table};
pub use market::{
    MarketDataGateway, MarketSnapshot, PricePoint, RateSource, RiskFreeRate, StaticMarketData,
    Timeframe,
};
pub use model::{ModelFamily, SectorModelSpec};
pub use reference::{
    ActiveCompanies, ClusterMembership, CoefficientTable, MembershipEntry, ReferenceConfig,
    ReferenceStore, normalize_ticker,
};
pub use sector::{GicsSector, SectorCode};
pub use yahoo::YahooGateway;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_gateways_at_crate_root() {
        fn assert_gateway<G: MarketDataGateway>() {}
        assert_gateway::<YahooGateway>();
        assert_gateway::<StaticMarketData>();
    }
}
