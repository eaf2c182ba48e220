// src/wizard/draft.rs

//! Claim drafts read from TOML files.
//!
//! A draft carries every wizard answer at once; `apply` replays them step by
//! step through a `WizardSession`, so a file goes through the same checks as
//! interactive input.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{DisruptionForm, DisruptionReason, FlightDetails, ReservationInfo};
use crate::wizard::flights::connection_codes_from_slots;
use crate::wizard::session::WizardSession;

/// All wizard answers for one claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimDraft {
    pub reservation: ReservationInfo,

    pub main_flight: FlightDetails,

    /// Intermediate airports in travel order; blank entries are empty slots
    #[serde(default)]
    pub connections: Vec<String>,

    /// One entry per leg when `connections` is non-empty
    #[serde(default)]
    pub connection_flights: Vec<FlightDetails>,

    /// Index of the disrupted flight; a direct flight is always flagged
    #[serde(default)]
    pub flagged: Option<usize>,

    pub disruption: DisruptionForm,
}

impl ClaimDraft {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Drive a fresh wizard through every step up to eligibility.
    pub fn apply(&self, wizard: &mut WizardSession) -> Result<DisruptionReason> {
        wizard.start_over();
        wizard.submit_reservation(self.reservation.clone())?;

        let slots = self
            .connections
            .iter()
            .map(|code| Some(code.clone()))
            .collect::<Vec<_>>();
        let codes = connection_codes_from_slots(&slots)?;
        wizard.submit_main_flight(self.main_flight.clone(), &codes)?;

        if !codes.is_empty() {
            if self.connection_flights.len() != codes.len() + 1 {
                return Err(AppError::validation(format!(
                    "{} connections need {} connection flights, got {}",
                    codes.len(),
                    codes.len() + 1,
                    self.connection_flights.len()
                )));
            }
            for (index, details) in self.connection_flights.iter().enumerate() {
                wizard.submit_connection_flight(index, details.clone())?;
            }
            if let Some(index) = self.flagged {
                wizard.flag_flight(index)?;
            }
            wizard.complete_connections()?;
        } else if let Some(index) = self.flagged {
            wizard.flag_flight(index)?;
        }

        wizard.update_disruption(self.disruption.clone());
        wizard.complete_disruption()
    }
}
