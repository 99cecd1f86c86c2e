mod cli;
mod config;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::info;

use cli::{Cli, Commands, HistoryCommands};
use portfolio_calc_core::models::holding::PortfolioInput;
use portfolio_calc_core::services::trading_calendar::local_today;
use portfolio_calc_core::PortfolioCalculator;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.global.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = config::load_settings(&cli.global)?;
    let json = cli.global.json;
    info!(
        "Using {} prices and {} history at {}",
        settings.price_provider, settings.history_store, settings.api_base_url
    );

    let calculator = PortfolioCalculator::new(settings);
    let locale = calculator.locale();

    match cli.command {
        Commands::Calculate {
            client,
            start_date,
            balance,
            holdings,
            no_save,
        } => {
            let input = PortfolioInput::new(client, start_date, balance, holdings);

            let (performance, save_error) = if no_save {
                (calculator.calculate(&input).await?, None)
            } else {
                let outcome = calculator.calculate_and_save(&input).await?;
                (outcome.performance, outcome.save_error)
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&performance)?);
            } else {
                print!("{}", render::render_performance(&locale, &performance));
                print!(
                    "{}",
                    render::render_charts(&locale, &calculator.charts(&performance))
                );
                println!(
                    "\n{} ({})",
                    locale.t("calculationDone").green(),
                    performance.client_name
                );
                if let Some(id) = performance.id {
                    println!("{} {id}", locale.t("savedAs"));
                }
            }

            if let Some(e) = save_error {
                eprintln!("{} {e}", format!("{}:", locale.t("saveFailed")).yellow());
            }
            Ok(())
        }

        Commands::History { action } => match action {
            HistoryCommands::List => {
                let records = calculator
                    .history()
                    .await
                    .context("Failed to fetch history")?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&records)?);
                } else {
                    print!("{}", render::render_history(&locale, &records));
                }
                Ok(())
            }
            HistoryCommands::Show { id } => {
                let record = calculator
                    .history_detail(id)
                    .await
                    .with_context(|| format!("Failed to load history record {id}"))?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&record)?);
                } else {
                    print!("{}", render::render_performance(&locale, &record));
                }
                Ok(())
            }
        },

        Commands::Dates { resolve } => {
            let today = local_today();
            let bounds = calculator.start_date_bounds(today);
            let suggestions = calculator.date_suggestions(today);
            let resolved = resolve.map(|d| (d, calculator.resolve_trading_date(d, today)));

            if json {
                let value = serde_json::json!({
                    "minStartDate": bounds.0,
                    "maxStartDate": bounds.1,
                    "suggestions": suggestions,
                    "resolved": resolved.map(|(_, trading)| trading),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print!(
                    "{}",
                    render::render_dates(&locale, bounds, &suggestions, resolved)
                );
            }
            Ok(())
        }
    }
}
