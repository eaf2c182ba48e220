//! Case submission payload and case records returned by the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::models::{AggregatedFlight, DisruptionReason, id_from_any};

/// Processing status of a case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseStatus {
    #[default]
    Pending,
    Assigned,
    Valid,
    Invalid,
}

/// Reservation block of a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseReservation {
    pub reservation_number: String,
    #[serde(default)]
    pub flights: Vec<AggregatedFlight>,
}

impl CaseReservation {
    pub fn flagged_flight(&self) -> Option<&AggregatedFlight> {
        self.flights.iter().find(|f| f.is_flagged)
    }
}

/// Draft case sent to eligibility check and case creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseSubmission {
    pub status: CaseStatus,
    pub disruption_reason: DisruptionReason,
    pub disruption_info: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "clientID")]
    pub client_id: String,
    pub reservation: CaseReservation,
}

impl CaseSubmission {
    /// Stable digest of the payload, ignoring the draft timestamp.
    pub fn fingerprint(&self) -> Result<String> {
        let mut hasher = Sha256::new();
        hasher.update(self.client_id.as_bytes());
        hasher.update(self.disruption_reason.as_str().as_bytes());
        hasher.update(self.disruption_info.as_bytes());
        hasher.update(serde_json::to_vec(&self.reservation)?);
        Ok(hex::encode(hasher.finalize()))
    }
}

/// A stored case as returned by `/cases` endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    #[serde(deserialize_with = "id_from_any")]
    pub id: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<CaseStatus>,
    #[serde(default)]
    pub disruption_reason: Option<DisruptionReason>,
    #[serde(default)]
    pub disruption_info: Option<String>,
    #[serde(default, rename = "clientID")]
    pub client_id: Option<String>,
    #[serde(default)]
    pub reservation: Option<CaseReservation>,
}

impl CaseRecord {
    /// One-line summary for listings.
    pub fn summary(&self) -> String {
        let reason = self
            .disruption_reason
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        let status = self
            .status
            .map(|s| format!("{s:?}"))
            .unwrap_or_else(|| "-".to_string());
        let date = self
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        let reservation = self
            .reservation
            .as_ref()
            .map(|r| r.reservation_number.as_str())
            .unwrap_or("-");
        format!("#{} [{}] {} {} {}", self.id, status, date, reservation, reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FlightDetails;
    use chrono::TimeZone;

    fn submission() -> CaseSubmission {
        CaseSubmission {
            status: CaseStatus::Pending,
            disruption_reason: DisruptionReason::Arrived3hLate,
            disruption_info: "Late".into(),
            date: Utc.with_ymd_and_hms(2026, 5, 2, 10, 0, 0).unwrap(),
            client_id: "7".into(),
            reservation: CaseReservation {
                reservation_number: "AB12CD".into(),
                flights: vec![AggregatedFlight {
                    flight_details: FlightDetails::leg("OTP", "LHR"),
                    is_flagged: true,
                }],
            },
        }
    }

    #[test]
    fn test_submission_wire_names() {
        let json = serde_json::to_value(submission()).unwrap();
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["disruptionReason"], "ARRIVED_3H_LATE");
        assert_eq!(json["clientID"], "7");
        assert_eq!(json["reservation"]["reservationNumber"], "AB12CD");
        assert_eq!(json["reservation"]["flights"][0]["isFlagged"], true);
        assert_eq!(
            json["reservation"]["flights"][0]["flightDetails"]["departingAirport"],
            "OTP"
        );
    }

    #[test]
    fn test_fingerprint_ignores_date() {
        let first = submission();
        let mut second = submission();
        second.date = Utc.with_ymd_and_hms(2026, 5, 3, 10, 0, 0).unwrap();
        assert_eq!(first.fingerprint().unwrap(), second.fingerprint().unwrap());

        second.disruption_info = "Very late".into();
        assert_ne!(first.fingerprint().unwrap(), second.fingerprint().unwrap());
    }

    #[test]
    fn test_case_record_accepts_numeric_id() {
        let record: CaseRecord = serde_json::from_str(
            r#"{"id": 12, "date": "2026-05-02T10:00:00Z", "status": "VALID", "disruptionReason": "NEVER_ARRIVED"}"#,
        )
        .unwrap();
        assert_eq!(record.id, "12");
        assert_eq!(record.status, Some(CaseStatus::Valid));
        assert!(record.summary().contains("NEVER_ARRIVED"));
    }
}
