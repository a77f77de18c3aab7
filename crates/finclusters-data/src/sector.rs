//! GICS (Global Industry Classification Standard) sector codes.
//!
//! The reference tables identify sectors as `GICS_NN` strings, Yahoo Finance
//! reports its own sector labels. Both resolve to [`GicsSector`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// GICS Level 1 sectors (11 sectors).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GicsSector {
    /// Energy
    Energy,

    /// Materials
    Materials,

    /// Industrials
    Industrials,

    /// Consumer Discretionary
    ConsumerDiscretionary,

    /// Consumer Staples
    ConsumerStaples,

    /// Health Care
    HealthCare,

    /// Financials
    Financials,

    /// Information Technology
    InformationTechnology,

    /// Communication Services
    CommunicationServices,

    /// Utilities
    Utilities,

    /// Real Estate
    RealEstate,
}

impl GicsSector {
    /// Returns all GICS sectors in code order.
    pub fn all() -> Vec<Self> {
        vec![
            Self::Energy,
            Self::Materials,
            Self::Industrials,
            Self::ConsumerDiscretionary,
            Self::ConsumerStaples,
            Self::HealthCare,
            Self::Financials,
            Self::InformationTechnology,
            Self::CommunicationServices,
            Self::Utilities,
            Self::RealEstate,
        ]
    }

    /// Returns the sector code (2-digit).
    pub const fn code(&self) -> u8 {
        match self {
            Self::Energy => 10,
            Self::Materials => 15,
            Self::Industrials => 20,
            Self::ConsumerDiscretionary => 25,
            Self::ConsumerStaples => 30,
            Self::HealthCare => 35,
            Self::Financials => 40,
            Self::InformationTechnology => 45,
            Self::CommunicationServices => 50,
            Self::Utilities => 55,
            Self::RealEstate => 60,
        }
    }

    /// Returns the full sector name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::InformationTechnology => "Information Technology",
            Self::HealthCare => "Health Care",
            Self::Financials => "Financials",
            Self::ConsumerDiscretionary => "Consumer Discretionary",
            Self::CommunicationServices => "Communication Services",
            Self::Industrials => "Industrials",
            Self::ConsumerStaples => "Consumer Staples",
            Self::Energy => "Energy",
            Self::Utilities => "Utilities",
            Self::RealEstate => "Real Estate",
            Self::Materials => "Materials",
        }
    }

    /// Parse a sector from its code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            10 => Some(Self::Energy),
            15 => Some(Self::Materials),
            20 => Some(Self::Industrials),
            25 => Some(Self::ConsumerDiscretionary),
            30 => Some(Self::ConsumerStaples),
            35 => Some(Self::HealthCare),
            40 => Some(Self::Financials),
            45 => Some(Self::InformationTechnology),
            50 => Some(Self::CommunicationServices),
            55 => Some(Self::Utilities),
            60 => Some(Self::RealEstate),
            _ => None,
        }
    }

    /// The key used by the reference tables, e.g. `GICS_45`.
    pub fn table_key(&self) -> String {
        format!("GICS_{}", self.code())
    }

    /// Resolve a market-data sector label.
    ///
    /// Accepts the GICS names as well as the Yahoo Finance labels
    /// ("Technology", "Consumer Cyclical", "Healthcare", ...).
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "technology" | "information technology" => Some(Self::InformationTechnology),
            "consumer cyclical" | "consumer discretionary" => Some(Self::ConsumerDiscretionary),
            "consumer defensive" | "consumer staples" => Some(Self::ConsumerStaples),
            "healthcare" | "health care" => Some(Self::HealthCare),
            "financial services" | "financials" | "financial" => Some(Self::Financials),
            "communication services" => Some(Self::CommunicationServices),
            "basic materials" | "materials" => Some(Self::Materials),
            "industrials" => Some(Self::Industrials),
            "energy" => Some(Self::Energy),
            "utilities" => Some(Self::Utilities),
            "real estate" => Some(Self::RealEstate),
            _ => None,
        }
    }
}

impl fmt::Display for GicsSector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Sector code as stored in the reference tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectorCode {
    /// A recognized GICS sector.
    Gics(GicsSector),
    /// Anything that does not parse as `GICS_NN`, kept verbatim.
    Unsupported(String),
}

impl SectorCode {
    /// Parse a table value such as `GICS_45`, `GICS45` or `45`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix("GICS_")
            .or_else(|| trimmed.strip_prefix("GICS"))
            .unwrap_or(trimmed);

        digits
            .parse::<u8>()
            .ok()
            .and_then(GicsSector::from_code)
            .map_or_else(|| Self::Unsupported(trimmed.to_string()), Self::Gics)
    }

    /// The GICS sector, if recognized.
    pub const fn gics(&self) -> Option<GicsSector> {
        match self {
            Self::Gics(sector) => Some(*sector),
            Self::Unsupported(_) => None,
        }
    }
}

impl FromStr for SectorCode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for SectorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gics(sector) => write!(f, "{}", sector.table_key()),
            Self::Unsupported(raw) => write!(f, "{raw}"),
        }
    }
}
