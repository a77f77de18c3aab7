//! Text, JSON and Markdown rendering of command results.

use clap::ValueEnum;
use finclusters::{DashboardOutput, PeerSet};
use finclusters_data::{GicsSector, PricePoint, Timeframe};
use finclusters_models::available_models;
use finclusters_output::{DashboardReport, format_percent, format_price, format_range};
use serde::Serialize;
use serde_json::json;

/// Output format of the query commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable tables
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
    /// Markdown
    Markdown,
}

type RenderResult = Result<String, serde_json::Error>;

fn to_json<T: Serialize>(value: &T) -> RenderResult {
    serde_json::to_string_pretty(value)
}

pub(crate) fn peers(set: &PeerSet, format: OutputFormat) -> RenderResult {
    let subject = &set.subject;
    match format {
        OutputFormat::Json => to_json(set),
        OutputFormat::Markdown => {
            let mut out = format!(
                "# Peers of {}\n\n**Sector:** {}  \n**Cluster:** {} (FY {})\n\n",
                subject.ticker,
                subject.sector.name(),
                subject.cluster_id,
                subject.fiscal_year
            );
            if set.is_empty() {
                out.push_str("_No active peers._\n");
            }
            for peer in &set.peers {
                out.push_str(&format!("- {peer}\n"));
            }
            Ok(out)
        }
        OutputFormat::Text => {
            let mut out = format!(
                "\n{} | {} | cluster {} (FY {})\n",
                subject.ticker,
                subject.sector.name(),
                subject.cluster_id,
                subject.fiscal_year
            );
            if !subject.active {
                out.push_str("  (not on the active-companies list)\n");
            }
            out.push_str(&"-".repeat(60));
            out.push('\n');
            if set.is_empty() {
                out.push_str("  No active peers in this cluster.\n");
            } else {
                for chunk in set.peers.chunks(8) {
                    out.push_str(&format!("  {}\n", chunk.join("  ")));
                }
                out.push_str(&format!("\n  {} peers\n", set.peers.len()));
            }
            Ok(out)
        }
    }
}

pub(crate) fn returns(output: &DashboardOutput, format: OutputFormat) -> RenderResult {
    let returns = &output.returns;
    let peer_min = returns.peer_range.as_ref().map(|r| r.min);
    let peer_max = returns.peer_range.as_ref().map(|r| r.max);

    match format {
        OutputFormat::Json => to_json(&json!({
            "ticker": output.ticker(),
            "risk_free": output.risk_free,
            "returns": returns,
        })),
        OutputFormat::Markdown => Ok(format!(
            "# Expected return: {}\n\n| Method | Monthly return |\n|---|---|\n\
             | Model ({}) | {} |\n| Lowest peer | {} |\n| Highest peer | {} |\n| Analyst | {} |\n",
            output.ticker(),
            returns.expected.model_family,
            format_percent(Some(returns.expected.point)),
            format_percent(peer_min),
            format_percent(peer_max),
            format_percent(returns.analyst),
        )),
        OutputFormat::Text => {
            let mut out = format!(
                "\nExpected return: {} ({}, {} premiums)\n",
                output.ticker(),
                returns.expected.model_family,
                returns.expected.scenario
            );
            out.push_str(&"-".repeat(60));
            out.push('\n');
            out.push_str(&format!(
                "  Risk-free rate:   {} ({})\n",
                format_percent(Some(output.risk_free.value)),
                output.risk_free.source
            ));
            out.push_str(&format!(
                "  Model:            {}\n",
                format_percent(Some(returns.expected.point))
            ));
            out.push_str(&format!("  Lowest peer:      {}\n", format_percent(peer_min)));
            out.push_str(&format!("  Highest peer:     {}\n", format_percent(peer_max)));
            if let Some(range) = returns.peer_range.as_ref().filter(|r| !r.skipped.is_empty()) {
                out.push_str(&format!(
                    "  ({} of {} peers evaluated)\n",
                    range.evaluated.len(),
                    range.evaluated.len() + range.skipped.len()
                ));
            }
            out.push_str(&format!(
                "  Analyst-implied:  {}\n",
                format_percent(returns.analyst)
            ));
            Ok(out)
        }
    }
}

pub(crate) fn forecast(output: &DashboardOutput, format: OutputFormat) -> RenderResult {
    let forecast = &output.forecast;
    let snapshot = &output.snapshot;

    match format {
        OutputFormat::Json => to_json(&json!({
            "ticker": output.ticker(),
            "spot_price": snapshot.spot_price,
            "forward_eps": snapshot.forward_eps,
            "forward_pe": snapshot.forward_pe,
            "forecast": forecast,
        })),
        OutputFormat::Markdown => Ok(format!(
            "# Price forecast: {}\n\n| Method | Price |\n|---|---|\n\
             | Model-based | {} |\n| Peer-based | {} |\n| Analyst-based | {} |\n\n\
             **Current price:** {}\n",
            output.ticker(),
            format_price(forecast.model_price),
            format_range(forecast.peer_price_range.as_ref()),
            format_price(forecast.analyst_price),
            format_price(snapshot.spot_price),
        )),
        OutputFormat::Text => {
            let mut out = format!("\nPrice forecast: {}\n", snapshot.display_name());
            out.push_str(&"-".repeat(60));
            out.push('\n');
            out.push_str(&format!(
                "  Model-based:      {}\n",
                format_price(forecast.model_price)
            ));
            out.push_str(&format!(
                "  Peer-based:       {}\n",
                format_range(forecast.peer_price_range.as_ref())
            ));
            out.push_str(&format!(
                "  Analyst-based:    {}\n",
                format_price(forecast.analyst_price)
            ));
            out.push_str(&format!(
                "\n  Current price:    {}\n",
                format_price(snapshot.spot_price)
            ));
            Ok(out)
        }
    }
}

pub(crate) fn dashboard(report: &DashboardReport, format: OutputFormat) -> RenderResult {
    match format {
        OutputFormat::Json => to_json(report),
        OutputFormat::Markdown => Ok(report.to_markdown()),
        OutputFormat::Text => Ok(report.to_ascii_table()),
    }
}

pub(crate) fn history(
    ticker: &str,
    timeframe: Timeframe,
    points: &[PricePoint],
    format: OutputFormat,
) -> RenderResult {
    if format == OutputFormat::Json {
        return to_json(&json!({
            "ticker": ticker,
            "timeframe": timeframe.label(),
            "points": points,
        }));
    }

    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Ok(format!("\nNo price history for {ticker} ({timeframe})\n"));
    };
    let low = points.iter().map(|p| p.close).fold(f64::INFINITY, f64::min);
    let high = points.iter().map(|p| p.close).fold(f64::NEG_INFINITY, f64::max);
    let change = (first.close != 0.0).then(|| last.close / first.close - 1.0);

    let mut out = format!("\n{ticker} price history ({timeframe})\n");
    out.push_str(&"-".repeat(60));
    out.push('\n');
    out.push_str(&format!("  Period:    {} to {}\n", first.date, last.date));
    out.push_str(&format!("  Current:   {:.2}\n", last.close));
    out.push_str(&format!("  Range:     {low:.2} - {high:.2}\n"));
    out.push_str(&format!("  Change:    {}\n", format_percent(change)));
    out.push_str(&format!("  Sessions:  {}\n", points.len()));
    Ok(out)
}

pub(crate) fn models(format: OutputFormat) -> RenderResult {
    let models = available_models();
    if format == OutputFormat::Json {
        let entries: Vec<_> = models
            .iter()
            .map(|m| {
                json!({
                    "label": m.family.label(),
                    "name": m.name,
                    "factors": m.factors,
                    "equation": m.equation,
                })
            })
            .collect();
        return to_json(&entries);
    }

    let mut out = String::from("\nFactor models\n");
    out.push_str(&"=".repeat(60));
    out.push('\n');
    for model in models {
        out.push_str(&format!("\n{} ({})\n", model.name, model.family.label()));
        out.push_str(&format!("  Factors:   {}\n", model.factors.join(", ")));
        out.push_str(&format!("  Equation:  {}\n", model.equation));
        out.push_str(&format!("  {}\n", model.description));
    }
    Ok(out)
}

pub(crate) fn sectors(supported: &[GicsSector], format: OutputFormat) -> RenderResult {
    if format == OutputFormat::Json {
        let entries: Vec<_> = GicsSector::all()
            .into_iter()
            .map(|s| {
                json!({
                    "code": s.table_key(),
                    "name": s.name(),
                    "clustered": supported.contains(&s),
                })
            })
            .collect();
        return to_json(&entries);
    }

    let mut out = String::from("\nGICS Sectors:\n");
    for sector in GicsSector::all() {
        let marker = if supported.contains(&sector) { "*" } else { " " };
        out.push_str(&format!("  {marker} {:<9} {}\n", sector.table_key(), sector.name()));
    }
    out.push_str("\n  * cluster membership table configured\n");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use finclusters::TickerRecord;
    use rstest::rstest;

    fn peer_set(peers: &[&str]) -> PeerSet {
        PeerSet {
            subject: TickerRecord {
                ticker: "AAPL".to_string(),
                sector: GicsSector::InformationTechnology,
                cluster_id: 2,
                fiscal_year: 2023,
                active: true,
            },
            peers: peers.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[rstest]
    #[case(OutputFormat::Text, "MSFT  NVDA")]
    #[case(OutputFormat::Markdown, "- MSFT")]
    #[case(OutputFormat::Json, "\"peers\"")]
    fn test_peers(#[case] format: OutputFormat, #[case] expected: &str) {
        let out = peers(&peer_set(&["MSFT", "NVDA"]), format).unwrap();
        assert!(out.contains(expected));
    }

    #[test]
    fn test_no_peers() {
        let out = peers(&peer_set(&[]), OutputFormat::Text).unwrap();
        assert!(out.contains("No active peers"));
    }

    #[test]
    fn test_history_summary() {
        let points = vec![
            PricePoint {
                date: "2024-01-02".parse().unwrap(),
                close: 100.0,
            },
            PricePoint {
                date: "2024-06-28".parse().unwrap(),
                close: 90.0,
            },
            PricePoint {
                date: "2024-12-31".parse().unwrap(),
                close: 125.0,
            },
        ];
        let out = history("AAPL", Timeframe::OneYear, &points, OutputFormat::Text).unwrap();
        assert!(out.contains("Current:   125.00"));
        assert!(out.contains("Range:     90.00 - 125.00"));
        assert!(out.contains("Change:    25.00%"));

        let empty = history("AAPL", Timeframe::OneMonth, &[], OutputFormat::Text).unwrap();
        assert!(empty.contains("No price history"));
    }

    #[test]
    fn test_models_and_sectors() {
        let out = models(OutputFormat::Text).unwrap();
        assert!(out.contains("Carhart"));

        let out = sectors(&[GicsSector::HealthCare], OutputFormat::Text).unwrap();
        assert!(out.contains("* GICS_35"));
        assert!(out.contains("  GICS_45"));
    }
}
