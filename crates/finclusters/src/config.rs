//! Application configuration.
//!
//! A JSON file with two optional sections:
//!
//! ```json
//! {
//!   "reference": { "data_dir": "/srv/finclusters", "membership": { "GICS_45": "it.csv" } },
//!   "pricing": { "terminal_growth": 0.03, "fallback_risk_free": 0.04 }
//! }
//! ```
//!
//! Missing fields take their defaults.

use crate::error::{PipelineError, Result};
use finclusters_data::ReferenceConfig;
use finclusters_models::PricingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

const APP_DIR: &str = "finclusters";
const CONFIG_FILE: &str = "config.json";

/// Platform data directory for the reference tables.
///
/// - Linux: `~/.local/share/finclusters/`
/// - macOS: `~/Library/Application Support/finclusters/`
/// - Windows: `%APPDATA%\finclusters\`
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Platform location of the configuration file.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// Reference table locations and pricing constants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the reference tables live.
    pub reference: ReferenceConfig,
    /// Constants of the estimator and forecaster.
    pub pricing: PricingConfig,
}

impl AppConfig {
    /// Read a JSON configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let config_error = |reason: String| PipelineError::Config {
            path: path.to_path_buf(),
            reason,
        };

        let raw = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| config_error(e.to_string()))?;
        config.pricing.validate()?;

        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load the explicit file if given, else the platform config file if it
    /// exists, else the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }

        match default_config_path() {
            Some(path) if path.is_file() => Self::from_path(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Point the reference tables at another directory.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.reference.data_dir = data_dir.into();
        self
    }

    /// Use the platform data directory when the configured one is missing.
    pub fn or_default_data_dir(self) -> Self {
        if self.reference.data_dir.is_dir() {
            self
        } else {
            self.with_data_dir(default_data_dir())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use finclusters_data::ErrorKind;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{name}-{}.json", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = write_temp(
            "finclusters-config",
            r#"{ "pricing": { "terminal_growth": 0.025 }, "reference": { "data_dir": "/tmp/tables" } }"#,
        );
        let config = AppConfig::from_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_relative_eq!(config.pricing.terminal_growth, 0.025);
        assert_relative_eq!(config.pricing.fallback_risk_free, 0.04);
        assert_eq!(config.reference.data_dir, PathBuf::from("/tmp/tables"));
        assert_eq!(config.reference.membership.len(), 3);
    }

    #[test]
    fn test_invalid_file() {
        let path = write_temp("finclusters-bad-config", "{ not json");
        let err = AppConfig::from_path(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(err.kind(), ErrorKind::Config);

        let err = AppConfig::from_path(Path::new("/nonexistent/finclusters.json")).unwrap_err();
        assert!(matches!(err, PipelineError::Config { .. }));
    }

    #[test]
    fn test_with_data_dir() {
        let config = AppConfig::default().with_data_dir("/srv/data");
        assert_eq!(config.reference.data_dir, PathBuf::from("/srv/data"));
        assert!(default_data_dir().ends_with(APP_DIR));
    }
}
