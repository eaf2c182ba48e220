// src/services/client.rs

//! Shared HTTP client for the claims API.
//!
//! Every request carries `Authorization: Bearer <token>` while a user is
//! signed in, except paths on the configured exclusion list. Failed
//! responses become `AppError::Api` when the body is a problem detail.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ApiConfig, ProblemDetail};
use crate::session::SessionState;
use crate::utils::http::{create_async_client, endpoint};

/// Bearer-attaching client bound to one API base URL.
#[derive(Clone)]
pub struct ApiClient {
    config: Arc<ApiConfig>,
    base: Url,
    client: reqwest::Client,
    session: Arc<SessionState>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Arc<SessionState>) -> Result<Self> {
        Ok(Self {
            base: config.base_url()?,
            client: create_async_client(config)?,
            config: Arc::new(config.clone()),
            session,
        })
    }

    pub fn session(&self) -> &Arc<SessionState> {
        &self.session
    }

    /// Token to attach for `path`, if any.
    pub fn bearer_for(&self, path: &str) -> Option<String> {
        if self.config.is_excluded(path) {
            None
        } else {
            self.session.token()
        }
    }

    /// Start a request to `path` with credentials applied.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = endpoint(&self.base, path)?;
        log::debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        Ok(match self.bearer_for(path) {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// Send a request and turn error statuses into `AppError`.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        check_status(response).await
    }

    /// Send and decode a JSON response body.
    pub async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.send(builder).await?;
        Ok(response.json().await?)
    }

    /// Send when the response body is not needed.
    pub async fn send_unit(&self, builder: RequestBuilder) -> Result<()> {
        self.send(builder).await?;
        Ok(())
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send_json(self.request(Method::GET, path)?).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send_unit(self.request(Method::DELETE, path)?).await
    }

    /// Request carrying `body` as JSON.
    pub fn json_request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<RequestBuilder> {
        Ok(self.request(method, path)?.json(body))
    }
}

/// Map a non-success response to a problem-detail or status error.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    log::debug!("Request failed with {}: {}", status, body);
    Err(error_from_body(status.as_u16(), body))
}

fn error_from_body(status: u16, body: String) -> AppError {
    match ProblemDetail::from_body(&body) {
        Some(mut problem) => {
            if problem.status == 0 {
                problem.status = status;
            }
            AppError::Api(problem)
        }
        None => AppError::Status { status, body },
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::Config;
    use crate::session::tests::token_for;
    use crate::storage::MemoryStorage;

    pub(crate) fn client() -> ApiClient {
        let config = Config::default();
        let session = Arc::new(SessionState::new(
            &config,
            Arc::new(MemoryStorage::new()),
            Arc::new(MemoryStorage::new()),
        ));
        ApiClient::new(&config.api, session).unwrap()
    }

    #[tokio::test]
    async fn test_bearer_skips_excluded_routes() {
        let api = client();
        assert!(api.bearer_for("/cases").is_none());

        let token = token_for("5", "CLIENT", 3600);
        api.session().accept_token(&token).await.unwrap();

        assert_eq!(api.bearer_for("/cases").as_deref(), Some(token.as_str()));
        assert!(api.bearer_for("/auth/signin").is_none());
        assert!(api.bearer_for("/auth/register").is_none());
        assert_eq!(
            api.bearer_for("/auth/forgot-password").as_deref(),
            Some(token.as_str())
        );
    }

    #[tokio::test]
    async fn test_request_sets_authorization_header() {
        let api = client();
        api.session()
            .accept_token(&token_for("5", "CLIENT", 3600))
            .await
            .unwrap();

        let request = api.request(Method::GET, "/cases").unwrap().build().unwrap();
        let header = request.headers().get("authorization").unwrap();
        assert!(header.to_str().unwrap().starts_with("Bearer "));
        assert_eq!(request.url().as_str(), "http://localhost:8080/api/cases");

        let request = api
            .request(Method::POST, "/auth/signin")
            .unwrap()
            .build()
            .unwrap();
        assert!(request.headers().get("authorization").is_none());
    }

    /// JSON body of a built request.
    pub(crate) fn json_body(request: &reqwest::Request) -> serde_json::Value {
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn test_error_from_body() {
        let problem = error_from_body(
            422,
            r#"{"title":"Unprocessable","detail":"error.flight.invalid"}"#.to_string(),
        );
        match problem {
            AppError::Api(p) => {
                assert_eq!(p.status, 422);
                assert_eq!(p.detail, "error.flight.invalid");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(matches!(
            error_from_body(502, "Bad gateway".to_string()),
            AppError::Status { status: 502, .. }
        ));
    }
}
