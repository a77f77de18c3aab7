//! Precomputed reference tables produced by the offline training pipeline.

pub mod active;
pub mod coefficients;
pub mod membership;
pub mod store;

pub use active::ActiveCompanies;
pub use coefficients::{CoefficientTable, TickerEntry};
pub use membership::{ClusterMembership, MembershipEntry};
pub use store::{ReferenceConfig, ReferenceStore};

/// Canonical form of a ticker symbol: trimmed and uppercase.
pub fn normalize_ticker(ticker: &str) -> String {
    ticker.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ticker() {
        assert_eq!(normalize_ticker(" aapl "), "AAPL");
        assert_eq!(normalize_ticker("brk.b"), "BRK.B");
        assert_eq!(normalize_ticker("   "), "");
    }
}
