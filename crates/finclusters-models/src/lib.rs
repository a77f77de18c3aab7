#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/finclusters/finclusters/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analyst;
pub mod config;
pub mod error;
pub mod estimator;
pub mod forecast;
pub mod premium;
pub mod registry;

pub use analyst::analyst_implied_return;
pub use config::PricingConfig;
pub use error::{ModelError, Result};
pub use estimator::{ExpectedReturn, ReturnEstimator, ReturnRange};
pub use forecast::{ForecastInputs, PriceForecast, PriceForecaster, PriceRange};
pub use premium::{FactorPremiums, PremiumScenario};

// Re-export registry types for convenience
pub use registry::{FACTOR_NAMES, ModelInfo, available_models, model_info};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
