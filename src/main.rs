//! CLI interface for flight-inspo

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use flight_inspo::{prepare_results, CityCatalog, CityLookup, FlightResult, SimilarityThreshold, TripWindow};
use std::fs;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "flight-inspo")]
#[command(about = "Find travel destinations from flight-inspiration results")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a city name against the catalog, suggesting close spellings
    Suggest {
        /// City name as typed by the traveller
        city: String,
        /// JSON file mapping city names to city codes
        #[arg(short, long)]
        catalog: String,
        /// Minimum similarity (0-1) for a suggestion
        #[arg(short, long, default_value_t = SimilarityThreshold::default())]
        threshold: SimilarityThreshold,
    },
    /// Group inspiration results by destination country and city
    Group {
        /// JSON file holding an array of inspiration results
        #[arg(short, long)]
        input: String,
        /// Output file for JSON results
        #[arg(short, long)]
        output: Option<String>,
        /// Start of the time off (YYYY-MM-DD)
        #[arg(long, requires = "to", requires = "min_days")]
        from: Option<NaiveDate>,
        /// End of the time off (YYYY-MM-DD)
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,
        /// Shortest acceptable trip in days
        #[arg(long, requires = "from")]
        min_days: Option<u32>,
        /// Longest acceptable trip in days (defaults to the minimum)
        #[arg(long, requires = "min_days")]
        max_days: Option<u32>,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "flight_inspo=debug,info" } else { "flight_inspo=info,warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Suggest { city, catalog, threshold } => {
            let catalog = CityCatalog::load(&catalog)?;
            let lookup = catalog.resolve(&city, threshold.value());

            match &lookup {
                CityLookup::Found { name, code } => info!(city = %name, code = %code, "City found"),
                CityLookup::Suggestions { candidates, .. } => {
                    info!(suggestions = candidates.len(), "City not found, did you mean one of these?")
                }
                CityLookup::NotFound { query } => warn!(city = %query, "No matches found"),
            }

            println!("{}", serde_json::to_string_pretty(&lookup)?);
        }
        Commands::Group {
            input,
            output,
            from,
            to,
            min_days,
            max_days,
        } => {
            let window = match (from, to, min_days) {
                (Some(from), Some(to), Some(min_days)) => {
                    Some(TripWindow::new(from, to, min_days, max_days.unwrap_or(min_days))?)
                }
                _ => None,
            };

            let raw = fs::read_to_string(&input)?;
            let results: Vec<FlightResult> = serde_json::from_str(&raw)?;
            debug!(results = results.len(), input = %input, "Read inspiration results");

            let total = results.len();
            let grouped = prepare_results(results, window.as_ref());
            let json = serde_json::to_string_pretty(&grouped)?;

            if let Some(output_file) = output {
                fs::write(&output_file, &json)?;
                info!(path = %output_file, "Results saved");
            } else {
                println!("{}", json);
            }

            info!(
                received = total,
                kept = grouped.len(),
                "Grouped results by destination"
            );
            if grouped.is_empty() {
                warn!("No flight destinations matched the search");
            }
        }
    }

    Ok(())
}
