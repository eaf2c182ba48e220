// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use url::Url;

use crate::error::Result;
use crate::models::ApiConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &ApiConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Join an endpoint path onto the API base URL.
///
/// Leading slashes are ignored so `/cases` keeps the base path
/// (`https://host/api/` + `/cases` -> `https://host/api/cases`).
pub fn endpoint(base: &Url, path: &str) -> Result<Url> {
    Ok(base.join(path.trim_start_matches('/'))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path() {
        let base = Url::parse("https://claims.example.com/api/").unwrap();
        assert_eq!(
            endpoint(&base, "/cases/12").unwrap().as_str(),
            "https://claims.example.com/api/cases/12"
        );
        assert_eq!(
            endpoint(&base, "airports/fetch").unwrap().as_str(),
            "https://claims.example.com/api/airports/fetch"
        );
    }

    #[test]
    fn test_create_client_from_defaults() {
        assert!(create_async_client(&ApiConfig::default()).is_ok());
    }
}
