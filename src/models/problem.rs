//! RFC 7807 problem-detail payload returned by the API on failure.

use serde::{Deserialize, Serialize};

/// Structured error body. `detail` doubles as a translation key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemDetail {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub status: u16,
    pub title: String,
    pub detail: String,
    pub instance: String,
}

impl ProblemDetail {
    /// Parse a response body, returning `None` when it is not a problem detail.
    pub fn from_body(body: &str) -> Option<Self> {
        let problem: Self = serde_json::from_str(body).ok()?;
        if problem.detail.is_empty() && problem.title.is_empty() {
            return None;
        }
        Some(problem)
    }

    /// Key used to look up the user-facing message.
    pub fn message_key(&self) -> &str {
        if self.detail.is_empty() {
            &self.title
        } else {
            &self.detail
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_body_parses_problem() {
        let body = r#"{"type":"about:blank","status":409,"title":"Conflict","detail":"error.email.taken","instance":"/auth/register"}"#;
        let problem = ProblemDetail::from_body(body).unwrap();
        assert_eq!(problem.status, 409);
        assert_eq!(problem.message_key(), "error.email.taken");
    }

    #[test]
    fn test_from_body_rejects_other_json() {
        assert!(ProblemDetail::from_body(r#"{"token":"abc"}"#).is_none());
        assert!(ProblemDetail::from_body("<html>").is_none());
    }

    #[test]
    fn test_message_key_falls_back_to_title() {
        let problem = ProblemDetail {
            title: "Not Found".into(),
            ..ProblemDetail::default()
        };
        assert_eq!(problem.message_key(), "Not Found");
    }
}
