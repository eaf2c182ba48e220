// src/services/cases.rs

//! Case endpoints and the port used by the submission pipeline.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};

use crate::error::Result;
use crate::models::{CaseRecord, CaseSubmission};
use crate::services::ApiClient;

/// Calls the submission pipeline depends on.
#[async_trait]
pub trait CaseApi: Send + Sync {
    /// Ask the API whether the draft qualifies for compensation.
    async fn check_eligibility(&self, draft: &CaseSubmission) -> Result<bool>;

    /// Persist the draft as a new case.
    async fn create_case(&self, draft: &CaseSubmission) -> Result<CaseRecord>;
}

/// Service for the `/cases` endpoints.
#[derive(Clone)]
pub struct CaseService {
    api: ApiClient,
}

impl CaseService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// All cases (staff view).
    pub async fn list_cases(&self) -> Result<Vec<CaseRecord>> {
        self.api.get_json("/cases").await
    }

    pub async fn get_case(&self, id: &str) -> Result<CaseRecord> {
        self.api.get_json(&format!("/cases/{id}")).await
    }

    pub async fn cases_for_client(&self, client_id: &str) -> Result<Vec<CaseRecord>> {
        self.api.send_json(self.client_cases_request(client_id)?).await
    }

    pub async fn delete_case(&self, id: &str) -> Result<()> {
        self.api.delete(&format!("/cases/{id}")).await
    }

    fn client_cases_request(&self, client_id: &str) -> Result<RequestBuilder> {
        self.api
            .request(Method::GET, &format!("/cases/user/{client_id}"))
    }

    fn eligibility_request(&self, draft: &CaseSubmission) -> Result<RequestBuilder> {
        self.api
            .json_request(Method::POST, "/cases/check-eligibility", draft)
    }

    fn create_request(&self, draft: &CaseSubmission) -> Result<RequestBuilder> {
        self.api.json_request(Method::POST, "/cases", draft)
    }
}

#[async_trait]
impl CaseApi for CaseService {
    async fn check_eligibility(&self, draft: &CaseSubmission) -> Result<bool> {
        self.api.send_json(self.eligibility_request(draft)?).await
    }

    async fn create_case(&self, draft: &CaseSubmission) -> Result<CaseRecord> {
        self.api.send_json(self.create_request(draft)?).await
    }
}
