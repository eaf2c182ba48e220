//! Flight data collected by the wizard.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::validate_airport_code;

static FLIGHT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{2,3}\d{1,4}[A-Z]?$").expect("flight number pattern"));

/// One flight of the journey.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightDetails {
    #[serde(default)]
    pub flight_number: String,
    #[serde(default)]
    pub airline: String,
    #[serde(default)]
    pub reservation_number: String,
    pub departing_airport: String,
    pub destination_airport: String,
    #[serde(default)]
    pub planned_departure_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub planned_arrival_time: Option<DateTime<Utc>>,
}

impl FlightDetails {
    /// Empty flight data carrying only its airport codes.
    pub fn leg(
        departing_airport: impl Into<String>,
        destination_airport: impl Into<String>,
    ) -> Self {
        Self {
            departing_airport: departing_airport.into(),
            destination_airport: destination_airport.into(),
            ..Self::default()
        }
    }

    /// Arrival must come strictly after departure when both are known.
    pub fn check_schedule(&self) -> Result<()> {
        match (self.planned_departure_time, self.planned_arrival_time) {
            (Some(departure), Some(arrival)) if arrival <= departure => {
                Err(AppError::validation(format!(
                    "flight {}: planned arrival {} is not after departure {}",
                    self.flight_number, arrival, departure
                )))
            }
            _ => Ok(()),
        }
    }

    /// Full field check applied before flight data is stored.
    pub fn validate(&self) -> Result<()> {
        if !FLIGHT_NUMBER.is_match(&self.flight_number) {
            return Err(AppError::validation(format!(
                "invalid flight number '{}'",
                self.flight_number
            )));
        }
        if self.airline.trim().is_empty() {
            return Err(AppError::validation("airline is required"));
        }
        validate_airport_code("departing airport", &self.departing_airport)?;
        validate_airport_code("destination airport", &self.destination_airport)?;
        if self.planned_departure_time.is_none() {
            return Err(AppError::validation("planned departure time is required"));
        }
        self.check_schedule()
    }

    /// Upper-case codes and trim text fields.
    pub fn normalized(mut self) -> Self {
        self.flight_number = self.flight_number.replace(' ', "").to_uppercase();
        self.airline = self.airline.trim().to_string();
        self.departing_airport = self.departing_airport.trim().to_uppercase();
        self.destination_airport = self.destination_airport.trim().to_uppercase();
        self
    }
}

/// A flight as submitted, with its "problematic" marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedFlight {
    pub flight_details: FlightDetails,
    pub is_flagged: bool,
}
