// src/services/auth.rs

//! Sign-in, registration and password management.

use reqwest::{Method, RequestBuilder};

use crate::error::Result;
use crate::models::{
    ForgotPasswordRequest, PasswordUpdate, RegisterRequest, ResetPasswordRequest, SignInRequest,
    SignInResponse,
};
use crate::services::ApiClient;
use crate::session::Identity;

/// Result of a sign-in call.
#[derive(Debug, Clone)]
pub struct SignInOutcome {
    /// `None` when the issued token could not be decoded
    pub identity: Option<Identity>,
    /// The user must change the generated password
    pub is_first_login: bool,
}

/// Service for the `/auth` endpoints.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Exchange credentials for a token and start the session.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignInOutcome> {
        let response: SignInResponse = self
            .api
            .send_json(self.sign_in_request(email, password)?)
            .await?;
        let identity = self.api.session().accept_token(&response.token).await?;
        match &identity {
            Some(identity) => log::info!("Signed in as user {}", identity.user_id),
            None => log::warn!("Sign-in returned a token that could not be decoded"),
        }
        Ok(SignInOutcome {
            identity,
            is_first_login: response.is_first_login,
        })
    }

    pub async fn sign_out(&self) -> Result<()> {
        self.api.session().logout().await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<()> {
        self.api
            .send_unit(self.api.json_request(Method::POST, "/auth/register", request)?)
            .await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        self.api.send_unit(self.forgot_password_request(email)?).await
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<()> {
        self.api
            .send_unit(self.reset_password_request(token, new_password)?)
            .await
    }

    /// Replace the password of a signed-in user (first-login flow).
    pub async fn update_password(&self, user_id: &str, password: &str) -> Result<()> {
        self.api
            .send_unit(self.update_password_request(user_id, password)?)
            .await
    }

    fn sign_in_request(&self, email: &str, password: &str) -> Result<RequestBuilder> {
        let body = SignInRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        self.api.json_request(Method::POST, "/auth/signin", &body)
    }

    fn forgot_password_request(&self, email: &str) -> Result<RequestBuilder> {
        let body = ForgotPasswordRequest {
            email: email.trim().to_string(),
        };
        self.api
            .json_request(Method::POST, "/auth/forgot-password", &body)
    }

    fn reset_password_request(&self, token: &str, new_password: &str) -> Result<RequestBuilder> {
        let body = ResetPasswordRequest {
            token: token.to_string(),
            new_password: new_password.to_string(),
        };
        self.api
            .json_request(Method::POST, "/auth/reset-password", &body)
    }

    fn update_password_request(&self, user_id: &str, password: &str) -> Result<RequestBuilder> {
        let body = PasswordUpdate {
            password: password.to_string(),
        };
        self.api
            .json_request(Method::PATCH, &format!("/users/{user_id}"), &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::client::tests::{client, json_body};
    use crate::session::tests::token_for;

    #[test]
    fn test_sign_in_request() {
        let auth = AuthService::new(client());
        let request = auth
            .sign_in_request(" ana@example.com ", "pw")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.url().path(), "/api/auth/signin");
        assert!(request.headers().get("authorization").is_none());
        let body = json_body(&request);
        assert_eq!(body["email"], "ana@example.com");
        assert_eq!(body["password"], "pw");
    }

    #[test]
    fn test_password_reset_requests() {
        let auth = AuthService::new(client());

        let forgot = auth
            .forgot_password_request("ana@example.com")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(forgot.url().path(), "/api/auth/forgot-password");

        let reset = auth
            .reset_password_request("tok", "n3w")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(reset.method(), &Method::POST);
        assert_eq!(reset.url().path(), "/api/auth/reset-password");
        let body = json_body(&reset);
        assert_eq!(body["token"], "tok");
        assert_eq!(body["newPassword"], "n3w");
    }

    #[tokio::test]
    async fn test_update_password_patches_user() {
        let auth = AuthService::new(client());
        auth.api
            .session()
            .accept_token(&token_for("5", "CLIENT", 3600))
            .await
            .unwrap();

        let request = auth
            .update_password_request("5", "n3w")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.method(), &Method::PATCH);
        assert_eq!(request.url().path(), "/api/users/5");
        assert!(request.headers().get("authorization").is_some());
        assert_eq!(json_body(&request)["password"], "n3w");
    }
}
