//! Service layer for the claims API.
//!
//! This module contains one service per API resource:
//! - Authentication (`AuthService`)
//! - Airports and compensation (`AirportService`)
//! - Cases (`CaseService`, `CaseApi`)
//! - Documents (`DocumentService`)
//! - Contract PDFs (`ContractService`)
//! - Users (`UserService`)

mod airports;
mod auth;
mod cases;
mod client;
mod contracts;
mod documents;
mod users;

pub use airports::AirportService;
pub use auth::{AuthService, SignInOutcome};
pub use cases::{CaseApi, CaseService};
pub use client::ApiClient;
pub use contracts::ContractService;
pub use documents::DocumentService;
pub use users::UserService;
