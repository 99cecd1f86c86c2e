use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use portfolio_calc_core::models::holding::HoldingInput;

#[derive(Parser, Debug)]
#[command(name = "portfolio-calc")]
#[command(version, about = "Calculate portfolio returns from a start date to today")]
#[command(
    long_about = "Split an initial balance across stock tickers by percentage, fetch historical and current prices, and report per-stock and overall returns. Runs are saved to a history store."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Backend base URL (price proxy and history API)
    #[arg(long = "api-url", global = true)]
    pub api_url: Option<String>,

    /// Price source: backend, marketstack or yahoo
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// History store: remote, file or memory
    #[arg(long, global = true)]
    pub store: Option<String>,

    /// JSON file used by the file history store
    #[arg(long = "history-file", global = true)]
    pub history_file: Option<String>,

    /// Output language: zh or en
    #[arg(long, global = true)]
    pub lang: Option<String>,

    /// Abort all price lookups after this many seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Calculate returns for a set of allocations
    Calculate {
        /// Client name
        #[arg(short, long)]
        client: String,

        /// Start date (YYYY-MM-DD)
        #[arg(short, long = "start-date")]
        start_date: NaiveDate,

        /// Initial balance in dollars
        #[arg(short, long)]
        balance: f64,

        /// Holding as SYMBOL=PERCENT, repeatable (e.g. --holding AAPL=60)
        #[arg(short = 'H', long = "holding", required = true, value_parser = parse_holding)]
        holdings: Vec<HoldingInput>,

        /// Do not save the run to the history store
        #[arg(long = "no-save")]
        no_save: bool,
    },

    /// Browse saved calculation runs
    History {
        #[command(subcommand)]
        action: HistoryCommands,
    },

    /// Show the allowed start-date range and shortcuts
    Dates {
        /// Also show the trading day this date resolves to
        #[arg(long)]
        resolve: Option<NaiveDate>,
    },
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// List saved runs
    List,

    /// Show one saved run with per-stock rows
    Show {
        /// Record id
        id: i64,
    },
}

/// Parse `SYMBOL=PERCENT` (also accepts `SYMBOL:PERCENT`).
pub fn parse_holding(s: &str) -> Result<HoldingInput, String> {
    let (symbol, percentage) = s
        .split_once('=')
        .or_else(|| s.split_once(':'))
        .ok_or_else(|| format!("expected SYMBOL=PERCENT, got '{s}'"))?;

    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(format!("missing symbol in '{s}'"));
    }

    let percentage: f64 = percentage
        .trim()
        .trim_end_matches('%')
        .parse()
        .map_err(|e| format!("invalid percentage in '{s}': {e}"))?;

    Ok(HoldingInput::new(symbol, percentage))
}
