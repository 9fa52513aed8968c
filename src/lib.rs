//! # Flight Inspo Library
//!
//! Core of a travel-inspiration helper: suggests corrections for misspelled
//! origin cities against a known city catalog, and turns flat
//! flight-inspiration search results into a list grouped by destination
//! country and city with duplicate itineraries removed.
//!
//! Fetching results, token handling and rendering live outside this crate.

pub mod catalog;
pub mod grouping;
pub mod matcher;
pub mod window;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export main types for convenience
pub use catalog::{CityCatalog, CityLookup};
pub use grouping::{group_and_dedup, group_by_destination, Itinerary};
pub use matcher::{edit_distance, similarity, suggest, SimilarityThreshold, DEFAULT_SIMILARITY_THRESHOLD};
pub use window::TripWindow;

/// Error types for the flight-inspo library
#[derive(Error, Debug)]
pub enum InspoError {
    #[error("Invalid similarity threshold: {0}")]
    InvalidThreshold(String),

    #[error("Invalid trip window: {0}")]
    InvalidWindow(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// One destination offered by the flight-inspiration search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightResult {
    pub origin_airport: String,      // Airport code
    pub destination_airport: String, // Airport code
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    #[serde(default, rename = "destination_city_name", alias = "destination_city")]
    pub destination_city: Option<String>,
    #[serde(default, rename = "destination_country_name", alias = "destination_country")]
    pub destination_country: Option<String>,
    #[serde(default, rename = "origin_city_name", alias = "origin_city", skip_serializing_if = "Option::is_none")]
    pub origin_city: Option<String>,
    #[serde(default, rename = "origin_country_name", alias = "origin_country", skip_serializing_if = "Option::is_none")]
    pub origin_country: Option<String>,
    /// Caller-supplied fields carried through untouched (price, links, ...)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FlightResult {
    /// Create a result with no destination names and no extra payload
    pub fn new(
        origin_airport: impl Into<String>,
        destination_airport: impl Into<String>,
        departure_date: NaiveDate,
        return_date: NaiveDate,
    ) -> Self {
        Self {
            origin_airport: origin_airport.into(),
            destination_airport: destination_airport.into(),
            departure_date,
            return_date,
            destination_city: None,
            destination_country: None,
            origin_city: None,
            origin_country: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Set the destination city and country names
    pub fn with_destination(mut self, city: impl Into<String>, country: impl Into<String>) -> Self {
        self.destination_city = Some(city.into());
        self.destination_country = Some(country.into());
        self
    }
}

/// Fields that identify the same trip for duplicate removal
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub destination_airport: String,
    pub origin_airport: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
}

impl Itinerary for FlightResult {
    type Key = DedupKey;

    fn dedup_key(&self) -> DedupKey {
        DedupKey {
            destination_airport: self.destination_airport.clone(),
            origin_airport: self.origin_airport.clone(),
            departure_date: self.departure_date,
            return_date: self.return_date,
        }
    }
}

/// Filter results to the trip window (when given) and group them by
/// destination, ready for numbered presentation
pub fn prepare_results(results: Vec<FlightResult>, window: Option<&TripWindow>) -> Vec<FlightResult> {
    let results = match window {
        Some(window) => window.retain_admitted(results),
        None => results,
    };

    group_by_destination(results)
}
