//! Terminal and Markdown rendering of a dashboard report.
//!
//! Missing values are always printed as `unavailable`; a missing estimate is
//! never shown as zero.

use crate::report::DashboardReport;
use finclusters_models::PriceRange;
use std::fmt;

/// Placeholder for values that could not be computed.
pub const UNAVAILABLE: &str = "unavailable";

const WIDTH: usize = 72;

/// Format a decimal return as a percentage (`0.0131` → `1.31%`).
pub fn format_percent(value: Option<f64>) -> String {
    value.map_or_else(|| UNAVAILABLE.to_string(), |v| format!("{:.2}%", v * 100.0))
}

/// Format a price with two decimals.
pub fn format_price(value: Option<f64>) -> String {
    value.map_or_else(|| UNAVAILABLE.to_string(), |v| format!("{v:.2}"))
}

/// Format a price range, one-sided when a bound is missing.
pub fn format_range(range: Option<&PriceRange>) -> String {
    range.map_or_else(|| UNAVAILABLE.to_string(), ToString::to_string)
}

fn format_return_range(report: &DashboardReport) -> String {
    report.peer_returns.as_ref().map_or_else(
        || UNAVAILABLE.to_string(),
        |range| {
            format!(
                "{} - {}",
                format_percent(Some(range.min)),
                format_percent(Some(range.max))
            )
        },
    )
}

fn format_optional<T: fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| UNAVAILABLE.to_string(), |v| v.to_string())
}

impl DashboardReport {
    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();
        let company = &self.company;

        output.push_str(&format!(
            "\nDashboard: {} ({})\n",
            self.ticker,
            company.name.as_deref().unwrap_or(UNAVAILABLE)
        ));
        output.push_str(&"=".repeat(WIDTH));
        output.push('\n');

        output.push_str(&format!(
            "  Sector:                {}\n",
            format_optional(company.sector.map(|s| s.name()))
        ));
        output.push_str(&format!(
            "  Cluster:               {}",
            format_optional(company.cluster)
        ));
        if let Some(year) = company.fiscal_year {
            output.push_str(&format!(" (FY {year})"));
        }
        output.push('\n');
        output.push_str(&format!(
            "  Current Price:         {}\n",
            format_price(company.spot_price)
        ));
        output.push_str(&format!(
            "  Risk-Free Rate:        {} ({})\n",
            format_percent(Some(self.risk_free.value)),
            self.risk_free.source
        ));
        output.push_str(&format!("  Premium Scenario:      {}\n", self.scenario));

        output.push_str("\nPeers:\n");
        output.push_str(&"-".repeat(WIDTH));
        output.push('\n');
        if self.peers.is_empty() {
            output.push_str(&format!("  {UNAVAILABLE}\n"));
        } else {
            for chunk in self.peers.chunks(8) {
                output.push_str(&format!("  {}\n", chunk.join(", ")));
            }
        }

        output.push_str("\nExpected Monthly Return:\n");
        output.push_str(&"-".repeat(WIDTH));
        output.push('\n');
        let model = self.expected_return.as_ref();
        output.push_str(&format!(
            "  Model:                 {}",
            format_percent(model.map(|r| r.point))
        ));
        if let Some(r) = model {
            output.push_str(&format!(" ({})", r.model_family));
        }
        output.push('\n');
        output.push_str(&format!(
            "  Peer Range:            {}\n",
            format_return_range(self)
        ));
        output.push_str(&format!(
            "  Analyst-Implied:       {}\n",
            format_percent(self.analyst_return)
        ));

        output.push_str("\nPrice Forecast:\n");
        output.push_str(&"-".repeat(WIDTH));
        output.push('\n');
        output.push_str(&format!(
            "  Model-Based:           {}\n",
            format_price(self.forecast.model_price)
        ));
        output.push_str(&format!(
            "  Peer-Based:            {}\n",
            format_range(self.forecast.peer_price_range.as_ref())
        ));
        output.push_str(&format!(
            "  Analyst-Based:         {}\n",
            format_price(self.forecast.analyst_price)
        ));

        if !self.notes.is_empty() {
            output.push_str("\nNotes:\n");
            for note in &self.notes {
                output.push_str(&format!("  - {note}\n"));
            }
        }

        output.push_str(&"=".repeat(WIDTH));
        output.push('\n');

        output
    }

    /// Format as Markdown for documentation.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# Dashboard: {}\n\n", self.ticker));
        if let Some(name) = &self.company.name {
            output.push_str(&format!("**Company:** {name}\n\n"));
        }
        output.push_str(&format!(
            "**Risk-free rate:** {} ({})  \n**Scenario:** {}\n\n",
            format_percent(Some(self.risk_free.value)),
            self.risk_free.source,
            self.scenario
        ));

        output.push_str("## Peers\n\n");
        if self.peers.is_empty() {
            output.push_str(&format!("_{UNAVAILABLE}_\n\n"));
        } else {
            output.push_str(&format!("{}\n\n", self.peers.join(", ")));
        }

        output.push_str("## Estimates\n\n");
        output.push_str("| Method | Expected Return | Price |\n");
        output.push_str("|--------|-----------------|-------|\n");
        output.push_str(&format!(
            "| Model | {} | {} |\n",
            format_percent(self.expected_return.as_ref().map(|r| r.point)),
            format_price(self.forecast.model_price)
        ));
        output.push_str(&format!(
            "| Peers | {} | {} |\n",
            format_return_range(self),
            format_range(self.forecast.peer_price_range.as_ref())
        ));
        output.push_str(&format!(
            "| Analyst | {} | {} |\n",
            format_percent(self.analyst_return),
            format_price(self.forecast.analyst_price)
        ));

        output
    }
}

impl fmt::Display for DashboardReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dashboard: {}", self.ticker)?;
        writeln!(
            f,
            "  Expected Return: {}",
            format_percent(self.expected_return.as_ref().map(|r| r.point))
        )?;
        writeln!(f, "  Peers: {}", self.peers.len())?;
        writeln!(
            f,
            "  Model Price: {}",
            format_price(self.forecast.model_price)
        )?;
        Ok(())
    }
}
