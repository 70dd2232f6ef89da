use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use eventrisk::config::LoggingConfig;
use eventrisk::{AppState, EventAnalyzer, EventRequest, EventRiskConfig, EventRiskError};

#[derive(Parser, Debug)]
#[command(name = "eventrisk", version, about = "Historical weather risk analysis for future events", long_about = None)]
struct Cli {
    /// Log at debug level regardless of configuration
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyse the weather risk of an event
    Analyze {
        /// Place name, e.g. "Paris" or "Kochi, Kerala"
        #[arg(short, long)]
        location: String,
        /// First event day (YYYY-MM-DD)
        #[arg(short, long)]
        start: NaiveDate,
        /// Last event day (YYYY-MM-DD)
        #[arg(short, long)]
        end: NaiveDate,
        /// Seed for the simulation and destination sampling
        #[arg(long)]
        seed: Option<u64>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// Also analyse the first suggested alternative destination
        #[arg(long)]
        compare: bool,
    },
    /// Show the immediate forecast for a place
    Forecast {
        #[arg(short, long)]
        location: String,
    },
}

fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("eventrisk={level}")));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<EventRiskError>() {
                Some(err) => eprintln!("{}", err.user_message()),
                None => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = EventRiskConfig::load_from_path(cli.config.clone()).context("Failed to load configuration")?;
    init_tracing(&config.logging, cli.verbose);
    debug!("Loaded configuration: {:?}", config);

    let analyzer = EventAnalyzer::from_config(&config)?;

    match cli.command {
        Command::Analyze {
            location,
            start,
            end,
            seed,
            json,
            compare,
        } => {
            let seed = seed.unwrap_or_else(|| rand::rng().random());
            info!("Using seed {}", seed);
            let mut rng = StdRng::seed_from_u64(seed);
            let mut state = AppState::new();

            let request = EventRequest::new(location, start, end);
            let report = analyzer.analyze(&request, &mut rng).await?;
            let alternative = report.advice.alternative_destinations.first().cloned();
            state.record_primary(report);

            if compare {
                match alternative {
                    Some(place) => {
                        let request = EventRequest::new(place, start, end);
                        let report = analyzer.analyze(&request, &mut rng).await?;
                        state.record_comparison(report);
                    }
                    None => info!("No alternative destination to compare against"),
                }
            }

            if json {
                let value = serde_json::json!({
                    "original": state.original,
                    "comparison": state.comparison,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                if let Some(original) = &state.original {
                    print!("{original}");
                }
                if let Some(comparison) = &state.comparison {
                    println!();
                    println!("Comparison");
                    println!("==========");
                    print!("{comparison}");
                }
            }
        }
        Command::Forecast { location } => {
            let (resolved, days) = analyzer.forecast(&location).await?;
            println!("Immediate forecast for {}", resolved.address);
            if days.is_empty() {
                println!("  Unavailable");
            }
            for day in days {
                println!(
                    "  {}  {:>6.1}°C  {:>6.1}°C  {:>6.1} mm  {:>6.1} km/h",
                    day.date, day.max_temperature, day.min_temperature, day.precipitation, day.max_wind_speed
                );
            }
        }
    }

    Ok(())
}
