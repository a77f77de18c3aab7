//! Model Registry
//!
//! Descriptions of the factor models the coefficient table can select.

use finclusters_data::ModelFamily;

/// Factor names in premium-vector order.
pub const FACTOR_NAMES: [&str; 4] = ["MKT-RF", "SMB", "HML", "MOM"];

/// Model metadata
#[derive(Debug, Clone)]
pub struct ModelInfo {
    /// Model family
    pub family: ModelFamily,
    /// Human-readable name
    pub name: &'static str,
    /// Factors in beta order
    pub factors: &'static [&'static str],
    /// Regression equation
    pub equation: &'static str,
    /// Brief description of the model
    pub description: &'static str,
}

/// Get model info by family
pub const fn model_info(family: ModelFamily) -> ModelInfo {
    match family {
        ModelFamily::Capm => ModelInfo {
            family,
            name: "CAPM",
            factors: &["MKT-RF"],
            equation: "R - RF = a + b_MKT (MKT - RF) + e",
            description: "Single-factor model: exposure to the market excess return",
        },
        ModelFamily::ThreeFactor => ModelInfo {
            family,
            name: "Fama-French 3-Factor",
            factors: &["MKT-RF", "SMB", "HML"],
            equation: "R - RF = a + b_MKT (MKT - RF) + b_SMB SMB + b_HML HML + e",
            description: "Adds the size (small minus big) and value (high minus low) factors",
        },
        ModelFamily::FourFactor => ModelInfo {
            family,
            name: "Carhart 4-Factor",
            factors: &FACTOR_NAMES,
            equation: "R - RF = a + b_MKT (MKT - RF) + b_SMB SMB + b_HML HML + b_MOM MOM + e",
            description: "Adds the momentum factor to the Fama-French three factors",
        },
    }
}

/// Get all available model info
pub fn available_models() -> Vec<ModelInfo> {
    ModelFamily::all().iter().copied().map(model_info).collect()
}
