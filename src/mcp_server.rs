// src/mcp_server.rs

use rmcp::{
    ServerHandler, ServiceExt,
    model::{ServerCapabilities, ServerInfo},
    schemars, tool,
    transport::stdio,
};
use flight_inspo::{
    prepare_results, CityCatalog, CityLookup, FlightResult, SimilarityThreshold, TripWindow,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use anyhow::Result;
use tracing::{info, warn, error, debug};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use std::path::PathBuf;

/// Flight inspiration MCP server
#[derive(Default, Clone)]
pub struct InspoServer;

impl InspoServer {
    pub fn new() -> Self {
        Self
    }

    /// Initialize logging to file
    fn init_logging() -> Result<()> {
        // stdout carries the protocol, so logs go to files
        let log_dir = PathBuf::from("logs");
        std::fs::create_dir_all(&log_dir)?;

        let file_appender = tracing_appender::rolling::daily(&log_dir, "flight-inspo-mcp.log");

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info"))
            .add_directive("flight_inspo=debug".parse()?);

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .json()
            )
            .init();

        info!("Logging initialized - logs will be written to logs/flight-inspo-mcp.log.*");
        Ok(())
    }
}

/// City suggestion parameters
#[derive(Debug, Deserialize, Clone, schemars::JsonSchema)]
pub struct SuggestCitiesParams {
    #[schemars(description = "City name as typed by the traveller (e.g., Londno)")]
    pub city: String,
    #[schemars(description = "Known cities as an object mapping city name to city code (e.g., {\"london\": \"LON\"})")]
    pub catalog: HashMap<String, String>,
    #[schemars(description = "Minimum similarity between 0 and 1 for a suggestion (default: 0.65)")]
    pub threshold: Option<f64>,
}

/// Result grouping parameters
#[derive(Debug, Deserialize, Clone, schemars::JsonSchema)]
pub struct GroupResultsParams {
    #[schemars(description = "Array of inspiration results, each with origin_airport, destination_airport, departure_date, return_date, destination_city_name and destination_country_name")]
    pub results: serde_json::Value,
    #[schemars(description = "Start of the time off in YYYY-MM-DD format")]
    pub earliest: Option<String>,
    #[schemars(description = "End of the time off in YYYY-MM-DD format")]
    pub latest: Option<String>,
    #[schemars(description = "Shortest acceptable trip in days (1-15)")]
    pub min_days: Option<u32>,
    #[schemars(description = "Longest acceptable trip in days (1-15, default: min_days)")]
    pub max_days: Option<u32>,
}

fn error_json(message: String) -> String {
    serde_json::json!({ "error": message }).to_string()
}

#[tool(tool_box)]
impl InspoServer {
    /// Resolve a city name against a catalog, with "did you mean" suggestions
    #[tool(description = "Resolve a typed city name against a catalog of known cities. Returns the city code on an exact match, otherwise close spellings to choose from.")]
    async fn suggest_cities(
        &self,
        #[tool(aggr)] params: SuggestCitiesParams,
    ) -> String {
        info!(
            city = %params.city,
            catalog_size = params.catalog.len(),
            threshold = params.threshold,
            "City suggestion request received"
        );

        let threshold = match params.threshold.map(SimilarityThreshold::new).transpose() {
            Ok(threshold) => threshold.unwrap_or_default(),
            Err(e) => {
                warn!("Invalid threshold: {}", e);
                return error_json(e.to_string());
            }
        };

        let catalog = CityCatalog::new(params.catalog);
        let lookup = catalog.resolve(&params.city, threshold.value());

        match &lookup {
            CityLookup::Found { code, .. } => info!(code = %code, "City resolved"),
            CityLookup::Suggestions { candidates, .. } => {
                info!(suggestions = candidates.len(), "Returning suggestions")
            }
            CityLookup::NotFound { .. } => info!("No close match found"),
        }

        serde_json::to_string_pretty(&lookup)
            .unwrap_or_else(|e| error_json(format!("Failed to serialize lookup: {}", e)))
    }

    /// Group inspiration results by destination
    #[tool(description = "Order flight-inspiration results by destination country, then city, removing duplicate itineraries. Optionally drop results outside a time-off window (earliest, latest, min_days, max_days).")]
    async fn group_results(
        &self,
        #[tool(aggr)] params: GroupResultsParams,
    ) -> String {
        let results: Vec<FlightResult> = match serde_json::from_value(params.results) {
            Ok(results) => results,
            Err(e) => {
                error!("Invalid results payload: {}", e);
                return error_json(format!("Invalid results: {}", e));
            }
        };

        info!(
            results = results.len(),
            earliest = params.earliest.as_deref(),
            latest = params.latest.as_deref(),
            min_days = params.min_days,
            max_days = params.max_days,
            "Group request received"
        );

        let window = match build_trip_window(&params.earliest, &params.latest, params.min_days, params.max_days) {
            Ok(window) => window,
            Err(e) => {
                warn!("Invalid trip window: {}", e);
                return error_json(e);
            }
        };

        let total = results.len();
        let grouped = prepare_results(results, window.as_ref());
        debug!(received = total, kept = grouped.len(), "Grouping completed");

        serde_json::json!({
            "total_results": grouped.len(),
            "removed": total - grouped.len(),
            "results": grouped,
        })
        .to_string()
    }
}

fn build_trip_window(
    earliest: &Option<String>,
    latest: &Option<String>,
    min_days: Option<u32>,
    max_days: Option<u32>,
) -> Result<Option<TripWindow>, String> {
    match (earliest, latest, min_days) {
        (None, None, None) if max_days.is_none() => Ok(None),
        (Some(earliest), Some(latest), Some(min_days)) => {
            let earliest = parse_date(earliest)?;
            let latest = parse_date(latest)?;
            TripWindow::new(earliest, latest, min_days, max_days.unwrap_or(min_days))
                .map(Some)
                .map_err(|e| e.to_string())
        }
        _ => Err("A trip window needs earliest, latest and min_days".to_string()),
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    value
        .parse::<NaiveDate>()
        .map_err(|_| format!("Date must be in YYYY-MM-DD format, got {}", value))
}

#[tool(tool_box)]
impl ServerHandler for InspoServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("A travel inspiration helper. Resolves misspelled city names against a known catalog and groups flight-inspiration results by destination country and city without duplicates.".into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = InspoServer::init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    info!("Starting MCP inspiration server");

    let server = InspoServer::new();
    let transport = stdio();

    // SDK handles initialization, tool discovery, and message routing
    let service = server.serve(transport).await?;

    info!("MCP service started, waiting for requests");

    service.waiting().await?;

    info!("MCP service shutting down");
    Ok(())
}
