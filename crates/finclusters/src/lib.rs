#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/finclusters/finclusters/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod peers;
pub mod pipeline;
pub mod session;

// Re-export main types from sub-crates
pub use finclusters_data as data;
pub use finclusters_models as models;
pub use finclusters_output as output;

pub use config::{AppConfig, default_config_path, default_data_dir};
pub use error::{PipelineError, Result};
pub use peers::{ClusterResolver, PeerSet, TickerRecord};
pub use pipeline::{AnalysisRequest, Dashboard, DashboardOutput, ReturnEstimates};
pub use session::Session;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
