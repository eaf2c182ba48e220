// src/wizard/flights.rs

//! Flight aggregation for the claim wizard.
//!
//! Holds the main flight, the connection legs derived from intermediate
//! airports, and which flight is marked as the disrupted one. Legs chain from
//! the reservation's departure airport through each connection to the final
//! destination.

use crate::error::{AppError, Result};
use crate::models::{AggregatedFlight, FlightDetails, validate_airport_code};

/// Maximum number of intermediate airports (legs = connections + 1).
pub const MAXIMUM_CONNECTIONS: usize = 4;

/// Turn the connection-airport form slots into an ordered code list.
///
/// Filled slots must be contiguous from the first one; a blank slot followed
/// by a filled one is rejected.
pub fn connection_codes_from_slots(slots: &[Option<String>]) -> Result<Vec<String>> {
    let mut codes = Vec::new();
    let mut seen_gap = false;
    for (index, slot) in slots.iter().enumerate() {
        let code = slot
            .as_deref()
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty());
        match code {
            Some(code) if seen_gap => {
                return Err(AppError::validation(format!(
                    "connection {} ({}) follows an empty connection slot",
                    index + 1,
                    code
                )));
            }
            Some(code) => {
                validate_airport_code(&format!("connection {}", index + 1), &code)?;
                if codes.last() == Some(&code) {
                    return Err(AppError::validation(format!(
                        "connection {} repeats the previous airport {}",
                        index + 1,
                        code
                    )));
                }
                codes.push(code);
            }
            None => seen_gap = true,
        }
    }
    if codes.len() > MAXIMUM_CONNECTIONS {
        return Err(AppError::validation(format!(
            "at most {MAXIMUM_CONNECTIONS} connections are supported"
        )));
    }
    Ok(codes)
}

/// One leg of a journey with connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionLeg {
    pub departing_airport: String,
    pub destination_airport: String,
    /// Set once the leg's form has been completed
    pub data: Option<FlightDetails>,
}

/// Main flight, connection legs and flag state.
#[derive(Debug, Clone, Default)]
pub struct FlightAggregation {
    main_flight: Option<FlightDetails>,
    legs: Vec<ConnectionLeg>,
    flags: Vec<bool>,
    all_flights: Vec<AggregatedFlight>,
}

impl FlightAggregation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn main_flight(&self) -> Option<&FlightDetails> {
        self.main_flight.as_ref()
    }

    pub fn set_main_flight(&mut self, details: FlightDetails) {
        self.main_flight = Some(details);
    }

    pub fn legs(&self) -> &[ConnectionLeg] {
        &self.legs
    }

    pub fn flags(&self) -> &[bool] {
        &self.flags
    }

    /// The materialized flight list, in travel order.
    pub fn all_flights(&self) -> &[AggregatedFlight] {
        &self.all_flights
    }

    pub fn flight_count(&self) -> usize {
        self.all_flights.len()
    }

    /// Derive legs from intermediate airports, replacing previous connection data.
    ///
    /// `n` codes give `n + 1` legs: departing -> codes[0] -> ... -> destination.
    pub fn set_connection_strings(
        &mut self,
        airport_codes: &[String],
        departing: &str,
        destination: &str,
    ) -> Result<()> {
        if airport_codes.len() > MAXIMUM_CONNECTIONS {
            return Err(AppError::validation(format!(
                "at most {MAXIMUM_CONNECTIONS} connections are supported, got {}",
                airport_codes.len()
            )));
        }

        let stops = std::iter::once(departing)
            .chain(airport_codes.iter().map(String::as_str))
            .chain(std::iter::once(destination))
            .collect::<Vec<_>>();
        if let Some(pair) = stops.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(AppError::validation(format!(
                "a flight cannot depart from and arrive at {}",
                pair[0]
            )));
        }

        self.reset_connection_data();

        self.legs = stops
            .windows(2)
            .map(|pair| ConnectionLeg {
                departing_airport: pair[0].to_string(),
                destination_airport: pair[1].to_string(),
                data: None,
            })
            .collect();
        self.flags = vec![false; self.legs.len()];
        log::debug!("Derived {} connection legs", self.legs.len());
        Ok(())
    }

    /// Empty flight data pre-filled with a leg's airports.
    pub fn leg_template(&self, index: usize) -> Result<FlightDetails> {
        let leg = self.leg(index)?;
        Ok(FlightDetails::leg(
            leg.departing_airport.clone(),
            leg.destination_airport.clone(),
        ))
    }

    fn leg(&self, index: usize) -> Result<&ConnectionLeg> {
        self.legs.get(index).ok_or_else(|| {
            AppError::validation(format!(
                "connection leg {} does not exist ({} legs)",
                index,
                self.legs.len()
            ))
        })
    }

    /// Overwrite one leg's flight data.
    pub fn update_connection_flight_data(
        &mut self,
        index: usize,
        data: Option<FlightDetails>,
    ) -> Result<()> {
        self.leg(index)?;
        self.legs[index].data = data;
        Ok(())
    }

    /// Every leg has data; vacuously true without legs.
    pub fn are_all_connection_flights_valid(&self) -> bool {
        self.legs.iter().all(|leg| leg.data.is_some())
    }

    /// Build the final flight list from the legs and their flags.
    pub fn create_all_flights(&mut self, reservation_number: &str) -> Result<&[AggregatedFlight]> {
        if let Some(index) = self.legs.iter().position(|leg| leg.data.is_none()) {
            return Err(AppError::validation(format!(
                "connection leg {} ({} -> {}) has no flight data",
                index + 1,
                self.legs[index].departing_airport,
                self.legs[index].destination_airport
            )));
        }

        self.all_flights = self
            .legs
            .iter()
            .zip(&self.flags)
            .filter_map(|(leg, &is_flagged)| {
                leg.data.clone().map(|mut flight_details| {
                    flight_details.reservation_number = reservation_number.to_string();
                    AggregatedFlight {
                        flight_details,
                        is_flagged,
                    }
                })
            })
            .collect();
        Ok(&self.all_flights)
    }

    /// Single-flight journey: the main flight is the disrupted one.
    pub fn add_direct_flight(&mut self, details: FlightDetails) {
        self.reset_connection_data();
        self.main_flight = Some(details.clone());
        self.flags = vec![true];
        self.all_flights = vec![AggregatedFlight {
            flight_details: details,
            is_flagged: true,
        }];
    }

    /// Mark one flight as disrupted and clear every other mark.
    pub fn toggle_flag(&mut self, index: usize) -> Result<()> {
        let count = self.flags.len().max(self.all_flights.len());
        if index >= count {
            return Err(AppError::validation(format!(
                "flight {index} does not exist ({count} flights)"
            )));
        }

        self.flags = (0..count).map(|i| i == index).collect();
        for (i, flight) in self.all_flights.iter_mut().enumerate() {
            flight.is_flagged = i == index;
        }
        Ok(())
    }

    pub fn flagged_index(&self) -> Option<usize> {
        self.flags.iter().position(|&f| f)
    }

    /// Clear legs, flags and the materialized list; keep the main flight.
    pub fn reset_connection_data(&mut self) {
        self.legs.clear();
        self.flags.clear();
        self.all_flights.clear();
    }

    pub fn reset_all_data(&mut self) {
        self.reset_connection_data();
        self.main_flight = None;
    }
}
