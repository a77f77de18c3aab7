//! Interactive shell.
//!
//! Keeps one [`Session`] across commands. Changing the ticker, the
//! risk-free rate or the premium scenario recomputes the dashboard.

use crate::integration::render::{self, OutputFormat};
use finclusters::{Dashboard, Session};
use finclusters_data::{MarketDataGateway, Timeframe};
use finclusters_models::PremiumScenario;
use finclusters_output::{ExportFormat, Exporter};
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const HELP: &str = "\
Commands:
  ticker <SYMBOL>        select a ticker and show its dashboard
  rf <PERCENT> | rf auto set a manual risk-free rate, or use the live yield
  scenario <NAME>        historical | forward_looking
  show                   recompute the dashboard
  peers                  list cluster peers
  returns                expected-return section
  forecast               price-forecast section
  history [TIMEFRAME]    price history (1M 3M 6M 1Y 2Y 5Y Max)
  export <PATH>          write the dashboard (.json or .csv)
  help                   this message
  quit                   leave the shell";

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ShellCommand {
    Ticker(String),
    RiskFree(Option<f64>),
    Scenario(PremiumScenario),
    Show,
    Peers,
    Returns,
    Forecast,
    History(Timeframe),
    Export(PathBuf),
    Help,
    Quit,
    Empty,
}

impl ShellCommand {
    /// Parse one input line. Risk-free rates are entered in percent.
    pub(crate) fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(Self::Empty);
        };
        let argument = words.next();

        match (command.to_ascii_lowercase().as_str(), argument) {
            ("ticker" | "t", Some(symbol)) => Ok(Self::Ticker(symbol.to_string())),
            ("rf", Some(arg)) if arg.eq_ignore_ascii_case("auto") => Ok(Self::RiskFree(None)),
            ("rf", Some(arg)) => arg
                .trim_end_matches('%')
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|percent| Self::RiskFree(Some(percent / 100.0)))
                .ok_or_else(|| format!("invalid risk-free rate: {arg}")),
            ("scenario", Some(name)) => name
                .parse()
                .map(Self::Scenario)
                .map_err(|e: finclusters_models::ModelError| e.to_string()),
            ("show", None) => Ok(Self::Show),
            ("peers", None) => Ok(Self::Peers),
            ("returns", None) => Ok(Self::Returns),
            ("forecast", None) => Ok(Self::Forecast),
            ("history", None) => Ok(Self::History(Timeframe::default())),
            ("history", Some(tf)) => tf.parse().map(Self::History).map_err(|e| e.to_string()),
            ("export", Some(path)) => Ok(Self::Export(PathBuf::from(path))),
            ("help" | "?", _) => Ok(Self::Help),
            ("quit" | "exit" | "q", _) => Ok(Self::Quit),
            (other, _) => Err(format!("unknown command or missing argument: {other} (try 'help')")),
        }
    }

    const fn recomputes(&self) -> bool {
        matches!(
            self,
            Self::Ticker(_) | Self::RiskFree(_) | Self::Scenario(_) | Self::Show
        )
    }
}

/// Run the shell until `quit` or end of input.
pub(crate) async fn run<G: MarketDataGateway>(
    dashboard: &Dashboard<'_, G>,
    mut session: Session,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    println!("FinClusters interactive shell. Type 'help' for commands.");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{}> ", session.ticker().unwrap_or(""));
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let command = match ShellCommand::parse(&line?) {
            Ok(ShellCommand::Quit) => break,
            Ok(command) => command,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };

        if let Err(e) = execute(dashboard, &mut session, &command, format).await {
            eprintln!("Error: {e}");
        }
    }

    Ok(())
}

async fn execute<G: MarketDataGateway>(
    dashboard: &Dashboard<'_, G>,
    session: &mut Session,
    command: &ShellCommand,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    match command {
        ShellCommand::Ticker(symbol) => {
            session.select_ticker(symbol)?;
        }
        ShellCommand::RiskFree(rate) => session.set_risk_free(*rate)?,
        ShellCommand::Scenario(scenario) => session.set_scenario(*scenario),
        ShellCommand::Help => {
            println!("{HELP}");
            return Ok(());
        }
        ShellCommand::Empty | ShellCommand::Quit => return Ok(()),
        _ => {}
    }

    if command.recomputes() {
        if session.ticker().is_none() {
            println!("Select a ticker first: ticker <SYMBOL>");
            return Ok(());
        }
        let output = session.refresh(dashboard).await?;
        println!("{}", render::dashboard(&output.to_report()?, format)?);
        return Ok(());
    }

    let Some(output) = session.last() else {
        println!("No dashboard yet: select a ticker with 'ticker <SYMBOL>'");
        return Ok(());
    };

    match command {
        ShellCommand::Peers => match &output.peer_set {
            Some(set) => println!("{}", render::peers(set, format)?),
            None => println!("Peers unavailable for {}", output.ticker()),
        },
        ShellCommand::Returns => println!("{}", render::returns(output, format)?),
        ShellCommand::Forecast => println!("{}", render::forecast(output, format)?),
        ShellCommand::History(timeframe) => {
            let points = dashboard.price_history(output.ticker(), *timeframe).await?;
            println!("{}", render::history(output.ticker(), *timeframe, &points, format)?);
        }
        ShellCommand::Export(path) => {
            let report = output.to_report()?;
            report.export_to_file(path, ExportFormat::from_path(path)?)?;
            println!("Wrote {}", path.display());
        }
        _ => {}
    }

    Ok(())
}
