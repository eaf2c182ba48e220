// src/pipeline/submit.rs

//! Eligibility check followed by case creation.
//!
//! A case is created only after the API says the draft is eligible. Two
//! guards keep repeated triggering from creating duplicates:
//!
//! - only one submission may wait on the API at a time
//! - a payload identical to the last created case is refused

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{AppError, Result};
use crate::models::{CaseRecord, CaseSubmission};
use crate::services::CaseApi;

/// Terminal result of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Eligible; the API created this case
    Created(CaseRecord),
    /// Not eligible; nothing was created
    NotEligible,
}

#[derive(Debug, Clone)]
struct SubmittedCase {
    fingerprint: String,
    case_id: String,
}

/// Clears the in-flight flag when the submission finishes, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs the two-phase submission against a `CaseApi`.
pub struct CaseSubmitter {
    cases: Arc<dyn CaseApi>,
    in_flight: AtomicBool,
    last_created: Mutex<Option<SubmittedCase>>,
}

impl CaseSubmitter {
    pub fn new(cases: Arc<dyn CaseApi>) -> Self {
        Self {
            cases,
            in_flight: AtomicBool::new(false),
            last_created: Mutex::new(None),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn begin(&self) -> Result<InFlight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AppError::SubmissionInFlight)?;
        Ok(InFlight(&self.in_flight))
    }

    fn duplicate_of(&self, fingerprint: &str) -> Option<String> {
        let last = self.last_created.lock().unwrap_or_else(|e| e.into_inner());
        last.as_ref()
            .filter(|c| c.fingerprint == fingerprint)
            .map(|c| c.case_id.clone())
    }

    fn remember(&self, fingerprint: String, case_id: String) {
        let mut last = self.last_created.lock().unwrap_or_else(|e| e.into_inner());
        *last = Some(SubmittedCase {
            fingerprint,
            case_id,
        });
    }

    /// Forget the last created case so an identical draft may be sent again.
    pub fn clear_history(&self) {
        let mut last = self.last_created.lock().unwrap_or_else(|e| e.into_inner());
        *last = None;
    }

    /// Check eligibility, then create the case exactly once if eligible.
    ///
    /// Errors leave nothing recorded, so the same draft can be retried.
    pub async fn submit(&self, draft: &CaseSubmission) -> Result<SubmissionOutcome> {
        let _in_flight = self.begin()?;

        let fingerprint = draft.fingerprint()?;
        if let Some(case_id) = self.duplicate_of(&fingerprint) {
            log::warn!("Refusing resubmission of case {}", case_id);
            return Err(AppError::DuplicateSubmission { case_id });
        }

        let eligible = self
            .cases
            .check_eligibility(draft)
            .await
            .inspect_err(|e| log::error!("Eligibility check failed: {}", e))?;
        if !eligible {
            log::info!(
                "Reservation {} is not eligible ({})",
                draft.reservation.reservation_number,
                draft.disruption_reason
            );
            return Ok(SubmissionOutcome::NotEligible);
        }

        let record = self
            .cases
            .create_case(draft)
            .await
            .inspect_err(|e| log::error!("Case creation failed: {}", e))?;
        log::info!(
            "Created case {} for reservation {}",
            record.id,
            draft.reservation.reservation_number
        );
        self.remember(fingerprint, record.id.clone());
        Ok(SubmissionOutcome::Created(record))
    }
}
