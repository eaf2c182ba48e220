//! Airport reference data.

use serde::{Deserialize, Serialize};

/// An airport as listed by `GET /airports/fetch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airport {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
}

impl Airport {
    /// Case-insensitive match against code, name or city.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.code.to_lowercase() == query
            || self.name.to_lowercase().contains(&query)
            || self.city.to_lowercase().contains(&query)
    }

    /// Label shown in listings, e.g. `OTP - Henri Coanda (Bucharest, Romania)`.
    pub fn label(&self) -> String {
        format!("{} - {} ({}, {})", self.code, self.name, self.city, self.country)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn otp() -> Airport {
        Airport {
            code: "OTP".into(),
            name: "Henri Coanda".into(),
            city: "Bucharest".into(),
            country: "Romania".into(),
        }
    }

    #[test]
    fn test_matches() {
        let airport = otp();
        assert!(airport.matches("otp"));
        assert!(airport.matches("buch"));
        assert!(airport.matches(""));
        assert!(!airport.matches("LHR"));
    }
}
