//! Disruption answers and their mapping to reason codes.
//!
//! Answers are closed enums; the reason code follows from them through a
//! fixed decision table (`Disruption::reason`).

use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{AppError, Result};

/// Maximum description length, counted in user-perceived characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

/// Kind of disruption the passenger experienced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisruptionType {
    Cancellation,
    Delay,
    DeniedBoarding,
}

/// How long before departure the cancellation was announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancellationNotice {
    OverFourteenDays,
    UnderFourteenDays,
    OnDepartureDay,
}

/// Arrival delay at the final destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayLength {
    OverThreeHours,
    UnderThreeHours,
    NeverArrived,
}

/// Reason code sent to the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisruptionReason {
    #[serde(rename = "CANCELATION_NOTICE_OVER_14_DAYS")]
    CancelationNoticeOver14Days,
    #[serde(rename = "CANCELATION_NOTICE_UNDER_14_DAYS")]
    CancelationNoticeUnder14Days,
    #[serde(rename = "CANCELATION_ON_DAY_OF_DEPARTURE")]
    CancelationOnDayOfDeparture,
    #[serde(rename = "ARRIVED_3H_LATE")]
    Arrived3hLate,
    #[serde(rename = "ARRIVED_EARLY")]
    ArrivedEarly,
    #[serde(rename = "NEVER_ARRIVED")]
    NeverArrived,
    #[serde(rename = "DID_NOT_GIVE_THE_SEAT_VOLUNTARILY")]
    DidNotGiveTheSeatVoluntarily,
    #[serde(rename = "DID_GIVE_THE_SEAT_VOLUNTARILY")]
    DidGiveTheSeatVoluntarily,
}

impl DisruptionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CancelationNoticeOver14Days => "CANCELATION_NOTICE_OVER_14_DAYS",
            Self::CancelationNoticeUnder14Days => "CANCELATION_NOTICE_UNDER_14_DAYS",
            Self::CancelationOnDayOfDeparture => "CANCELATION_ON_DAY_OF_DEPARTURE",
            Self::Arrived3hLate => "ARRIVED_3H_LATE",
            Self::ArrivedEarly => "ARRIVED_EARLY",
            Self::NeverArrived => "NEVER_ARRIVED",
            Self::DidNotGiveTheSeatVoluntarily => "DID_NOT_GIVE_THE_SEAT_VOLUNTARILY",
            Self::DidGiveTheSeatVoluntarily => "DID_GIVE_THE_SEAT_VOLUNTARILY",
        }
    }
}

impl fmt::Display for DisruptionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-specific answers as entered; `None` means not answered yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisruptionAnswers {
    Cancellation {
        #[serde(default)]
        notice: Option<CancellationNotice>,
    },
    Delay {
        #[serde(default)]
        delay: Option<DelayLength>,
    },
    DeniedBoarding {
        #[serde(default)]
        gave_seat_voluntarily: Option<bool>,
    },
}

impl DisruptionAnswers {
    pub fn disruption_type(&self) -> DisruptionType {
        match self {
            Self::Cancellation { .. } => DisruptionType::Cancellation,
            Self::Delay { .. } => DisruptionType::Delay,
            Self::DeniedBoarding { .. } => DisruptionType::DeniedBoarding,
        }
    }

    /// Blank answers for a freshly selected type.
    pub fn empty(disruption_type: DisruptionType) -> Self {
        match disruption_type {
            DisruptionType::Cancellation => Self::Cancellation { notice: None },
            DisruptionType::Delay => Self::Delay { delay: None },
            DisruptionType::DeniedBoarding => Self::DeniedBoarding {
                gave_seat_voluntarily: None,
            },
        }
    }
}

/// A fully answered disruption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disruption {
    Cancellation(CancellationNotice),
    Delay(DelayLength),
    DeniedBoarding { gave_seat_voluntarily: bool },
}

impl Disruption {
    pub fn disruption_type(&self) -> DisruptionType {
        match self {
            Self::Cancellation(_) => DisruptionType::Cancellation,
            Self::Delay(_) => DisruptionType::Delay,
            Self::DeniedBoarding { .. } => DisruptionType::DeniedBoarding,
        }
    }

    /// Decision table from answers to reason code.
    pub fn reason(&self) -> DisruptionReason {
        match *self {
            Self::Cancellation(CancellationNotice::OverFourteenDays) => {
                DisruptionReason::CancelationNoticeOver14Days
            }
            Self::Cancellation(CancellationNotice::UnderFourteenDays) => {
                DisruptionReason::CancelationNoticeUnder14Days
            }
            Self::Cancellation(CancellationNotice::OnDepartureDay) => {
                DisruptionReason::CancelationOnDayOfDeparture
            }
            Self::Delay(DelayLength::OverThreeHours) => DisruptionReason::Arrived3hLate,
            Self::Delay(DelayLength::UnderThreeHours) => DisruptionReason::ArrivedEarly,
            Self::Delay(DelayLength::NeverArrived) => DisruptionReason::NeverArrived,
            Self::DeniedBoarding {
                gave_seat_voluntarily: false,
            } => DisruptionReason::DidNotGiveTheSeatVoluntarily,
            Self::DeniedBoarding {
                gave_seat_voluntarily: true,
            } => DisruptionReason::DidGiveTheSeatVoluntarily,
        }
    }
}

/// Disruption step form state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisruptionForm {
    pub answers: DisruptionAnswers,

    /// Whether the airline stated a reason for the disruption
    #[serde(default)]
    pub airline_motive: Option<bool>,

    /// The stated reason; required when `airline_motive` is `Some(true)`
    #[serde(default)]
    pub motive: Option<String>,

    /// Free-text account of what happened
    #[serde(default)]
    pub description: String,
}

impl DisruptionForm {
    pub fn new(disruption_type: DisruptionType) -> Self {
        Self {
            answers: DisruptionAnswers::empty(disruption_type),
            airline_motive: None,
            motive: None,
            description: String::new(),
        }
    }

    pub fn disruption_type(&self) -> DisruptionType {
        self.answers.disruption_type()
    }

    /// Switch type, discarding answers that belonged to the previous one.
    pub fn set_type(&mut self, disruption_type: DisruptionType) {
        if self.disruption_type() != disruption_type {
            self.answers = DisruptionAnswers::empty(disruption_type);
        }
    }

    pub fn description_length(&self) -> usize {
        self.description.graphemes(true).count()
    }

    /// Check every required answer and return the completed disruption.
    pub fn complete(&self) -> Result<Disruption> {
        let disruption = match self.answers {
            DisruptionAnswers::Cancellation { notice: Some(n) } => Disruption::Cancellation(n),
            DisruptionAnswers::Delay { delay: Some(d) } => Disruption::Delay(d),
            DisruptionAnswers::DeniedBoarding {
                gave_seat_voluntarily: Some(gave),
            } => Disruption::DeniedBoarding {
                gave_seat_voluntarily: gave,
            },
            _ => {
                return Err(AppError::validation(format!(
                    "{:?} follow-up answer is required",
                    self.disruption_type()
                )));
            }
        };

        match self.airline_motive {
            None => return Err(AppError::validation("airline motive answer is required")),
            Some(true) => {
                let motive = self.motive.as_deref().map(str::trim).unwrap_or("");
                if motive.is_empty() {
                    return Err(AppError::validation(
                        "motive is required when the airline gave one",
                    ));
                }
            }
            Some(false) => {}
        }

        if self.description_length() > MAX_DESCRIPTION_LENGTH {
            return Err(AppError::validation(format!(
                "description exceeds {MAX_DESCRIPTION_LENGTH} characters"
            )));
        }
        if self.info_text().graphemes(true).count() > MAX_DESCRIPTION_LENGTH {
            return Err(AppError::validation(format!(
                "description and airline motive together exceed {MAX_DESCRIPTION_LENGTH} characters"
            )));
        }

        Ok(disruption)
    }

    /// Whether the step may be left; stricter than per-field validity.
    pub fn has_all_required_fields(&self) -> bool {
        self.complete().is_ok()
    }

    /// Reason code for the current answers, if the type's answer is given.
    pub fn classify(&self) -> Option<DisruptionReason> {
        let disruption = match self.answers {
            DisruptionAnswers::Cancellation { notice } => Disruption::Cancellation(notice?),
            DisruptionAnswers::Delay { delay } => Disruption::Delay(delay?),
            DisruptionAnswers::DeniedBoarding {
                gave_seat_voluntarily,
            } => Disruption::DeniedBoarding {
                gave_seat_voluntarily: gave_seat_voluntarily?,
            },
        };
        Some(disruption.reason())
    }

    /// Description plus stated motive, as sent in `disruptionInfo`.
    pub fn info_text(&self) -> String {
        let description = self.description.trim();
        match (self.airline_motive, self.motive.as_deref().map(str::trim)) {
            (Some(true), Some(motive)) if !motive.is_empty() => {
                if description.is_empty() {
                    format!("Airline motive: {motive}")
                } else {
                    format!("{description}\nAirline motive: {motive}")
                }
            }
            _ => description.to_string(),
        }
    }
}
