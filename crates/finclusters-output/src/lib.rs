#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/finclusters/finclusters/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod report;
pub mod summary;

pub use export::{EstimateRecord, ExportError, ExportFormat, Exporter, PeerRecord};
pub use report::{CompanyProfile, DashboardReport, ReportBuilder, ReportError};
pub use summary::{UNAVAILABLE, format_percent, format_price, format_range};
