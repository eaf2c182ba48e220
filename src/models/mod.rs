// src/models/mod.rs

//! Domain models for the claim client.
//!
//! Wire types mirror the API's JSON (camelCase); answer enums used by the
//! wizard are closed so that impossible combinations cannot be expressed.

mod airport;
mod auth;
mod case;
mod config;
mod disruption;
mod document;
mod flight;
mod problem;
mod reservation;
mod user;

// Re-export all public types
pub use airport::Airport;
pub use auth::{
    Claims, ForgotPasswordRequest, PasswordUpdate, RegisterRequest, ResetPasswordRequest, Role,
    SignInRequest, SignInResponse,
};
pub use case::{CaseRecord, CaseReservation, CaseStatus, CaseSubmission};
pub use config::{ApiConfig, Config, LocaleConfig, LoggingConfig, SessionConfig};
pub use disruption::{
    CancellationNotice, DelayLength, Disruption, DisruptionAnswers, DisruptionForm,
    DisruptionReason, DisruptionType, MAX_DESCRIPTION_LENGTH,
};
pub use document::{Document, DocumentType};
pub use flight::{AggregatedFlight, FlightDetails};
pub use problem::ProblemDetail;
pub use reservation::{ReservationInfo, validate_airport_code, validate_reservation_number};
pub use user::{NewUser, User};

use serde::{Deserialize, Deserializer};

/// Accept identifiers sent either as JSON strings or numbers.
pub(crate) fn id_from_any<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}
