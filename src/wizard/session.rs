// src/wizard/session.rs

//! The claim wizard as one owned value.
//!
//! `WizardSession` holds everything entered so far and moves the navigator
//! only after the current step's input checks out. A failed check leaves
//! both the data and the step untouched.

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::{
    AggregatedFlight, CaseReservation, CaseStatus, CaseSubmission, DisruptionForm,
    DisruptionReason, FlightDetails, ReservationInfo,
};
use crate::wizard::flights::FlightAggregation;
use crate::wizard::steps::{StepNavigator, WizardStep};

/// State of one claim being filled in.
#[derive(Debug, Default)]
pub struct WizardSession {
    navigator: StepNavigator,
    reservation: Option<ReservationInfo>,
    flights: FlightAggregation,
    disruption: Option<DisruptionForm>,
}

impl WizardSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.navigator.step()
    }

    pub fn navigator(&self) -> &StepNavigator {
        &self.navigator
    }

    pub fn reservation(&self) -> Option<&ReservationInfo> {
        self.reservation.as_ref()
    }

    pub fn flights(&self) -> &FlightAggregation {
        &self.flights
    }

    pub fn disruption(&self) -> Option<&DisruptionForm> {
        self.disruption.as_ref()
    }

    fn expect_step(&self, expected: WizardStep) -> Result<()> {
        let current = self.step();
        if current == expected {
            Ok(())
        } else {
            Err(AppError::validation(format!(
                "cannot complete '{expected}' while on '{current}'"
            )))
        }
    }

    fn require_reservation(&self) -> Result<&ReservationInfo> {
        self.reservation
            .as_ref()
            .ok_or_else(|| AppError::validation("reservation details are missing"))
    }

    /// Step 1. A different reservation discards any flights entered for the old one.
    pub fn submit_reservation(&mut self, info: ReservationInfo) -> Result<()> {
        self.expect_step(WizardStep::Reservation)?;
        info.validate()?;

        if self.reservation.as_ref().is_some_and(|current| *current != info) {
            log::debug!("Reservation changed, clearing flight data");
            self.flights.reset_all_data();
        }
        self.reservation = Some(info);
        self.navigator.next();
        Ok(())
    }

    /// Step 2. Without connections the main flight is the whole journey and
    /// the connection step is skipped.
    pub fn submit_main_flight(
        &mut self,
        details: FlightDetails,
        connection_codes: &[String],
    ) -> Result<()> {
        self.expect_step(WizardStep::MainFlight)?;
        let reservation = self.require_reservation()?.clone();

        let mut details = details.normalized();
        details.reservation_number = reservation.reservation_number.clone();
        details.validate()?;

        if connection_codes.is_empty() {
            if details.departing_airport != reservation.departing_airport
                || details.destination_airport != reservation.destination_airport
            {
                return Err(AppError::validation(format!(
                    "a direct flight must fly {} -> {}",
                    reservation.departing_airport, reservation.destination_airport
                )));
            }
            self.flights.add_direct_flight(details);
            self.navigator.skip(2);
            return Ok(());
        }

        self.flights.set_connection_strings(
            connection_codes,
            &reservation.departing_airport,
            &reservation.destination_airport,
        )?;
        self.flights.set_main_flight(details);
        self.navigator.next();
        Ok(())
    }

    /// Store one connection leg. The leg's airports are fixed by the route.
    pub fn submit_connection_flight(&mut self, index: usize, details: FlightDetails) -> Result<()> {
        self.expect_step(WizardStep::ConnectionFlights)?;
        let template = self.flights.leg_template(index)?;

        let mut details = details.normalized();
        details.departing_airport = template.departing_airport;
        details.destination_airport = template.destination_airport;
        details.validate()?;

        self.flights.update_connection_flight_data(index, Some(details))
    }

    /// Mark the disrupted flight; any previous mark is cleared.
    pub fn flag_flight(&mut self, index: usize) -> Result<()> {
        self.flights.toggle_flag(index)
    }

    /// Leave step 3 once every leg is filled in.
    pub fn complete_connections(&mut self) -> Result<&[AggregatedFlight]> {
        self.expect_step(WizardStep::ConnectionFlights)?;
        let reservation_number = self.require_reservation()?.reservation_number.clone();
        if !self.flights.are_all_connection_flights_valid() {
            return Err(AppError::validation(
                "every connection flight must be filled in",
            ));
        }
        self.flights.create_all_flights(&reservation_number)?;
        self.navigator.next();
        Ok(self.flights.all_flights())
    }

    /// Replace the disruption answers; allowed on any step.
    pub fn update_disruption(&mut self, form: DisruptionForm) {
        self.disruption = Some(form);
    }

    /// Leave step 4 once the answers are complete and one flight is flagged.
    pub fn complete_disruption(&mut self) -> Result<DisruptionReason> {
        self.expect_step(WizardStep::Disruption)?;
        let form = self
            .disruption
            .as_ref()
            .ok_or_else(|| AppError::validation("disruption details are missing"))?;
        let reason = form.complete()?.reason();
        self.require_flagged_flight()?;
        self.navigator.next();
        Ok(reason)
    }

    fn require_flagged_flight(&self) -> Result<()> {
        let flagged = self
            .flights
            .all_flights()
            .iter()
            .filter(|f| f.is_flagged)
            .count();
        if flagged == 1 {
            Ok(())
        } else {
            Err(AppError::validation(
                "exactly one flight must be marked as disrupted",
            ))
        }
    }

    /// Go back one screen; from the disruption step a single-flight journey
    /// returns straight to the main flight.
    pub fn back(&mut self) {
        if self.step() == WizardStep::Disruption {
            self.navigator
                .go_back_skipping_if_single_flight(self.flights.flight_count());
        } else {
            self.navigator.previous();
        }
    }

    /// Payload for the eligibility check and case creation.
    pub fn draft_case(&self, client_id: &str, now: DateTime<Utc>) -> Result<CaseSubmission> {
        let reservation = self.require_reservation()?;
        let form = self
            .disruption
            .as_ref()
            .ok_or_else(|| AppError::validation("disruption details are missing"))?;
        let disruption = form.complete()?;
        self.require_flagged_flight()?;

        Ok(CaseSubmission {
            status: CaseStatus::Pending,
            disruption_reason: disruption.reason(),
            disruption_info: form.info_text(),
            date: now,
            client_id: client_id.to_string(),
            reservation: CaseReservation {
                reservation_number: reservation.reservation_number.clone(),
                flights: self.flights.all_flights().to_vec(),
            },
        })
    }

    /// Move past eligibility after the case was created.
    pub fn mark_submitted(&mut self) -> Result<()> {
        self.expect_step(WizardStep::Eligibility)?;
        self.navigator.next();
        Ok(())
    }

    /// Whether the data for `step` is in place.
    pub fn is_step_complete(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::Reservation => self.reservation.is_some(),
            WizardStep::MainFlight => self.flights.main_flight().is_some(),
            WizardStep::ConnectionFlights => {
                self.flights.flight_count() > 0 && self.flights.are_all_connection_flights_valid()
            }
            WizardStep::Disruption => {
                self.disruption
                    .as_ref()
                    .is_some_and(DisruptionForm::has_all_required_fields)
                    && self.require_flagged_flight().is_ok()
            }
            WizardStep::Eligibility | WizardStep::Submitted => {
                self.step() == WizardStep::Submitted
            }
        }
    }

    /// Discard everything and return to the first screen.
    pub fn start_over(&mut self) {
        self.reservation = None;
        self.flights.reset_all_data();
        self.disruption = None;
        self.navigator.reset_to_first_step();
    }
}
