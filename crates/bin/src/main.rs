//! FinClusters CLI binary.
//!
//! Cluster peers, expected returns and price forecasts for a ticker, as
//! one-shot commands or an interactive shell.

mod integration;

use clap::{Parser, Subcommand};
use finclusters::{AnalysisRequest, AppConfig, Dashboard, DashboardOutput, Session};
use finclusters_data::{ReferenceStore, Timeframe};
use finclusters_models::PremiumScenario;
use finclusters_output::{ExportFormat, Exporter};
use indicatif::{ProgressBar, ProgressStyle};
use integration::market::MarketSource;
use integration::render::{self, OutputFormat};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "finclusters")]
#[command(about = "FinClusters: cluster peers, factor-model returns and price forecasts", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the reference tables
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Offline market data snapshot (JSON) instead of Yahoo Finance
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Manual risk-free rate in percent, e.g. 4.5
    #[arg(long, global = true)]
    risk_free: Option<f64>,

    /// Factor premium scenario (historical or forward_looking)
    #[arg(long, global = true, default_value = "historical")]
    scenario: PremiumScenario,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the active cluster peers of a ticker
    Peers {
        /// Stock symbol
        ticker: String,

        /// Write the peer list to a file (.json or .csv)
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Model, peer and analyst expected returns
    Returns {
        /// Stock symbol
        ticker: String,
    },

    /// Model, peer and analyst price forecasts
    Forecast {
        /// Stock symbol
        ticker: String,
    },

    /// Full dashboard for a ticker
    Dashboard {
        /// Stock symbol
        ticker: String,

        /// Write the dashboard to a file (.json or .csv)
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Daily closing prices over a timeframe
    History {
        /// Stock symbol
        ticker: String,

        /// Timeframe: 1M, 3M, 6M, 1Y, 2Y, 5Y or Max
        #[arg(long, default_value = "1Y")]
        timeframe: Timeframe,
    },

    /// Cluster projection table of a ticker's sector
    Projection {
        /// Stock symbol
        ticker: String,
    },

    /// List the supported factor models
    Models,

    /// List GICS sectors and which have cluster tables
    Sectors,

    /// Interactive shell
    Shell,
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let format = cli.format;

    // Commands that need no reference tables.
    if matches!(cli.command, Commands::Models) {
        println!("{}", render::models(format)?);
        return Ok(());
    }

    let config = load_config(cli.config.as_deref(), cli.data_dir.as_deref())?;

    if matches!(cli.command, Commands::Sectors) {
        let supported: Vec<_> = config.reference.membership_paths()?.into_keys().collect();
        println!("{}", render::sectors(&supported, format)?);
        return Ok(());
    }

    let store = ReferenceStore::load(&config.reference)?;
    let market = MarketSource::open(cli.snapshot.as_deref())?;
    let dashboard = Dashboard::new(&store, &market, &config.pricing);
    let risk_free = cli.risk_free.map(|percent| percent / 100.0);

    let request = |ticker: &str| {
        AnalysisRequest::new(ticker)
            .with_risk_free(risk_free)
            .with_scenario(cli.scenario)
    };

    match &cli.command {
        Commands::Peers { ticker, export } => {
            let set = dashboard.resolver().resolve_peers(ticker)?;
            println!("{}", render::peers(&set, format)?);

            if let Some(path) = export {
                set.records().export_to_file(path, ExportFormat::from_path(path)?)?;
                println!("Peers written to {}", path.display());
            }
        }
        Commands::Returns { ticker } => {
            let output = fetch(&market, ticker, dashboard.run(&request(ticker))).await?;
            print_notes(&output);
            println!("{}", render::returns(&output, format)?);
        }
        Commands::Forecast { ticker } => {
            let output = fetch(&market, ticker, dashboard.run(&request(ticker))).await?;
            print_notes(&output);
            println!("{}", render::forecast(&output, format)?);
        }
        Commands::Dashboard { ticker, export } => {
            let output = fetch(&market, ticker, dashboard.run(&request(ticker))).await?;
            let report = output.to_report()?;
            println!("{}", render::dashboard(&report, format)?);

            if let Some(path) = export {
                report.export_to_file(path, ExportFormat::from_path(path)?)?;
                println!("Dashboard written to {}", path.display());
            }
        }
        Commands::History { ticker, timeframe } => {
            let points = fetch(&market, ticker, dashboard.price_history(ticker, *timeframe)).await?;
            println!("{}", render::history(ticker, *timeframe, &points, format)?);
        }
        Commands::Projection { ticker } => {
            let frame = dashboard.resolver().projection(ticker)?;
            println!("{frame}");
        }
        Commands::Shell => {
            let mut session = Session::new();
            session.set_risk_free(risk_free)?;
            session.set_scenario(cli.scenario);
            integration::shell::run(&dashboard, session, format).await?;
        }
        Commands::Models | Commands::Sectors => {}
    }

    Ok(())
}

fn load_config(
    config: Option<&Path>,
    data_dir: Option<&Path>,
) -> Result<AppConfig, finclusters::PipelineError> {
    let config = AppConfig::load(config)?;
    Ok(match data_dir {
        Some(dir) => config.with_data_dir(dir),
        None => config.or_default_data_dir(),
    })
}

/// Await a market-data bound future behind a spinner when the source is live.
async fn fetch<T, F>(market: &MarketSource, ticker: &str, work: F) -> F::Output
where
    F: Future<Output = finclusters::Result<T>>,
{
    if !market.is_live() {
        return work.await;
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Fetching market data for {}...", ticker.trim().to_uppercase()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = work.await;
    spinner.finish_and_clear();
    result
}

fn print_notes(output: &DashboardOutput) {
    for note in &output.notes {
        eprintln!("note: {note}");
    }
}
