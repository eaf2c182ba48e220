// src/services/contracts.rs

//! Contract PDF generation.

use reqwest::{Method, RequestBuilder};
use serde::Serialize;

use crate::error::Result;
use crate::services::ApiClient;

#[derive(Clone)]
pub struct ContractService {
    api: ApiClient,
}

impl ContractService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Render the contract template for `data`; returns the PDF bytes.
    pub async fn generate_contract<T: Serialize + ?Sized>(&self, data: &T) -> Result<Vec<u8>> {
        let response = self.api.send(self.contract_request(data)?).await?;
        Ok(response.bytes().await?.to_vec())
    }

    fn contract_request<T: Serialize + ?Sized>(&self, data: &T) -> Result<RequestBuilder> {
        Ok(self
            .api
            .json_request(Method::POST, "/pdf/generate", data)?
            .query(&[("template", "contract")]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::services::client::tests::{client, json_body};

    #[test]
    fn test_contract_request() {
        let contracts = ContractService::new(client());
        let request = contracts
            .contract_request(&json!({ "id": "7" }))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.url().path(), "/api/pdf/generate");
        assert_eq!(request.url().query(), Some("template=contract"));
        assert_eq!(json_body(&request)["id"], "7");
    }
}
