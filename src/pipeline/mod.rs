//! Network-facing flows built on the services.
//!
//! - `CaseSubmitter`: eligibility check then case creation, guarded against duplicates
//! - `LatestLookup`: lookups where a newer request supersedes older ones

pub mod lookup;
pub mod submit;

pub use lookup::{CompensationEstimator, LatestLookup};
pub use submit::{CaseSubmitter, SubmissionOutcome};
