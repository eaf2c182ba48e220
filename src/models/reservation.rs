//! Reservation entered in the first wizard step.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

static RESERVATION_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{6}$").expect("reservation number pattern"));

static AIRPORT_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").expect("airport code pattern"));

/// Check a three-letter IATA code (`A-Z` only).
pub fn validate_airport_code(field: &str, code: &str) -> Result<()> {
    if AIRPORT_CODE.is_match(code) {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "{field} must be a 3-letter airport code, got '{code}'"
        )))
    }
}

/// Check a six-character booking reference.
pub fn validate_reservation_number(value: &str) -> Result<()> {
    if RESERVATION_NUMBER.is_match(value) {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "reservation number must be 6 letters or digits, got '{value}'"
        )))
    }
}

/// Booking reference plus the journey's outer airports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationInfo {
    pub reservation_number: String,
    pub departing_airport: String,
    pub destination_airport: String,
}

impl ReservationInfo {
    /// Normalize user input (trim, upper-case) and validate it.
    pub fn new(
        reservation_number: &str,
        departing_airport: &str,
        destination_airport: &str,
    ) -> Result<Self> {
        let info = Self {
            reservation_number: reservation_number.trim().to_uppercase(),
            departing_airport: departing_airport.trim().to_uppercase(),
            destination_airport: destination_airport.trim().to_uppercase(),
        };
        info.validate()?;
        Ok(info)
    }

    pub fn validate(&self) -> Result<()> {
        validate_reservation_number(&self.reservation_number)?;
        validate_airport_code("departing airport", &self.departing_airport)?;
        validate_airport_code("destination airport", &self.destination_airport)?;
        if self.departing_airport == self.destination_airport {
            return Err(AppError::validation(
                "departing and destination airports must differ",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_input() {
        let info = ReservationInfo::new(" ab12cd ", "otp", "lhr").unwrap();
        assert_eq!(info.reservation_number, "AB12CD");
        assert_eq!(info.departing_airport, "OTP");
        assert_eq!(info.destination_airport, "LHR");
    }

    #[test]
    fn test_rejects_bad_reservation_number() {
        assert!(ReservationInfo::new("AB12C", "OTP", "LHR").is_err());
        assert!(ReservationInfo::new("AB12CDE", "OTP", "LHR").is_err());
        assert!(ReservationInfo::new("AB-12C", "OTP", "LHR").is_err());
    }

    #[test]
    fn test_rejects_bad_airports() {
        assert!(ReservationInfo::new("AB12CD", "OT1", "LHR").is_err());
        assert!(ReservationInfo::new("AB12CD", "OTPX", "LHR").is_err());
        assert!(ReservationInfo::new("AB12CD", "OTP", "OTP").is_err());
    }

    #[test]
    fn test_serializes_camel_case() {
        let info = ReservationInfo::new("AB12CD", "OTP", "LHR").unwrap();
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["reservationNumber"], "AB12CD");
        assert_eq!(json["departingAirport"], "OTP");
    }
}
