//! Trip window filtering
//!
//! The inspiration search only loosely honours the requested dates and
//! durations, so results are checked again against the traveller's time off.

use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::{FlightResult, InspoError};

/// Time off and acceptable trip lengths, in days counting both travel days
#[derive(Debug, Clone, PartialEq)]
pub struct TripWindow {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
    pub min_days: u32,
    pub max_days: u32,
}

impl TripWindow {
    /// Longest trip the inspiration search accepts
    pub const MAX_TRIP_DAYS: u32 = 15;

    /// Create a new TripWindow
    pub fn new(earliest: NaiveDate, latest: NaiveDate, min_days: u32, max_days: u32) -> Result<Self, InspoError> {
        if earliest > latest {
            return Err(InspoError::InvalidWindow(format!(
                "window must be in ascending order, got {} to {}",
                earliest, latest
            )));
        }
        if min_days == 0 || max_days > Self::MAX_TRIP_DAYS {
            return Err(InspoError::InvalidWindow(format!(
                "trip must be between 1 and {} days, got {}-{}",
                Self::MAX_TRIP_DAYS,
                min_days,
                max_days
            )));
        }
        if min_days > max_days {
            return Err(InspoError::InvalidWindow(format!(
                "minimum trip length {} exceeds maximum {}",
                min_days, max_days
            )));
        }

        let window = Self {
            earliest,
            latest,
            min_days,
            max_days,
        };
        if window.latest_departure() < earliest {
            return Err(InspoError::InvalidWindow(
                "trip duration cannot be longer than the time off".to_string(),
            ));
        }

        Ok(window)
    }

    /// Trip length in days, both travel days included
    pub fn trip_length(departure: NaiveDate, return_date: NaiveDate) -> i64 {
        (return_date - departure).num_days() + 1
    }

    /// Last departure date that still leaves room for the shortest trip
    pub fn latest_departure(&self) -> NaiveDate {
        self.latest - Duration::days(i64::from(self.min_days) - 1)
    }

    pub fn departure_range(&self) -> (NaiveDate, NaiveDate) {
        (self.earliest, self.latest_departure())
    }

    /// Duration parameter for the inspiration search, e.g. "8" or "8,10"
    pub fn duration_param(&self) -> String {
        if self.min_days == self.max_days {
            self.min_days.to_string()
        } else {
            format!("{},{}", self.min_days, self.max_days)
        }
    }

    /// Whether a result falls inside the time off with an acceptable length
    pub fn admits(&self, result: &FlightResult) -> bool {
        if result.departure_date < self.earliest || result.return_date > self.latest {
            return false;
        }

        let length = Self::trip_length(result.departure_date, result.return_date);
        length >= i64::from(self.min_days) && length <= i64::from(self.max_days)
    }

    /// Keep only admitted results, in their original order
    pub fn retain_admitted(&self, results: Vec<FlightResult>) -> Vec<FlightResult> {
        let before = results.len();
        let admitted: Vec<FlightResult> = results.into_iter().filter(|r| self.admits(r)).collect();

        debug!(
            before = before,
            after = admitted.len(),
            "Filtered results by trip window"
        );

        admitted
    }
}
