// src/wizard/steps.rs

//! Step counter for the claim wizard.
//!
//! The navigator only moves; callers check a step's validity before calling
//! `next()`. Front ends follow the current step through `subscribe()`.

use std::fmt;

use tokio::sync::watch;

/// Wizard screens in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    Reservation,
    MainFlight,
    ConnectionFlights,
    Disruption,
    Eligibility,
    Submitted,
}

impl WizardStep {
    pub const ALL: [WizardStep; 6] = [
        WizardStep::Reservation,
        WizardStep::MainFlight,
        WizardStep::ConnectionFlights,
        WizardStep::Disruption,
        WizardStep::Eligibility,
        WizardStep::Submitted,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn last() -> Self {
        Self::Submitted
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = match self {
            Self::Reservation => "Reservation",
            Self::MainFlight => "Main flight",
            Self::ConnectionFlights => "Connection flights",
            Self::Disruption => "Disruption",
            Self::Eligibility => "Eligibility",
            Self::Submitted => "Submitted",
        };
        f.write_str(title)
    }
}

/// Tracks the current step index.
#[derive(Debug)]
pub struct StepNavigator {
    current: watch::Sender<usize>,
}

impl StepNavigator {
    pub fn new() -> Self {
        let (current, _) = watch::channel(0);
        Self { current }
    }

    pub fn current_step(&self) -> usize {
        *self.current.borrow()
    }

    pub fn step(&self) -> WizardStep {
        WizardStep::from_index(self.current_step()).unwrap_or(WizardStep::last())
    }

    /// Receiver that sees every step change.
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.current.subscribe()
    }

    fn set(&self, index: usize) {
        let index = index.min(WizardStep::last().index());
        self.current.send_if_modified(|current| {
            if *current == index {
                false
            } else {
                *current = index;
                true
            }
        });
    }

    /// Advance one step; stays on the last step.
    pub fn next(&mut self) {
        self.skip(1);
    }

    /// Retreat one step; no-op on the first step.
    pub fn previous(&mut self) {
        self.set(self.current_step().saturating_sub(1));
    }

    /// Advance several steps at once.
    pub fn skip(&mut self, steps: usize) {
        self.set(self.current_step().saturating_add(steps));
    }

    /// Retreat two steps when the journey is a single flight (the connection
    /// step never applied), otherwise one.
    pub fn go_back_skipping_if_single_flight(&mut self, flight_count: usize) {
        let steps = if flight_count == 1 { 2 } else { 1 };
        self.set(self.current_step().saturating_sub(steps));
    }

    pub fn reset_to_first_step(&mut self) {
        self.set(0);
    }
}

impl Default for StepNavigator {
    fn default() -> Self {
        Self::new()
    }
}
