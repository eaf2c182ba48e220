//! Authentication requests and token claims.

use serde::{Deserialize, Serialize};

use crate::models::id_from_any;

/// Role carried in the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Employee,
    #[serde(alias = "USER")]
    Client,
}

impl Role {
    /// Staff may triage cases.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Employee)
    }
}

/// Claims decoded from the bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(deserialize_with = "id_from_any")]
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    pub exp: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub token: String,
    #[serde(default)]
    pub is_first_login: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

/// Body of `PATCH /users/{id}` when changing a password.
#[derive(Debug, Clone, Serialize)]
pub struct PasswordUpdate {
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_aliases() {
        let role: Role = serde_json::from_str("\"USER\"").unwrap();
        assert_eq!(role, Role::Client);
        assert!(Role::Employee.is_staff());
        assert!(!Role::Client.is_staff());
    }

    #[test]
    fn test_sign_in_response() {
        let response: SignInResponse =
            serde_json::from_str(r#"{"token":"abc","isFirstLogin":true}"#).unwrap();
        assert_eq!(response.token, "abc");
        assert!(response.is_first_login);
    }
}
