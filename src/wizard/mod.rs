//! Multi-step claim wizard.

pub mod draft;
pub mod flights;
pub mod session;
pub mod steps;

pub use draft::ClaimDraft;
pub use flights::{
    ConnectionLeg, FlightAggregation, MAXIMUM_CONNECTIONS, connection_codes_from_slots,
};
pub use session::WizardSession;
pub use steps::{StepNavigator, WizardStep};
