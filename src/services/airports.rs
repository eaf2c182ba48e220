// src/services/airports.rs

//! Airport listing and compensation estimates.

use reqwest::{Method, RequestBuilder};

use crate::error::Result;
use crate::models::{Airport, validate_airport_code};
use crate::services::ApiClient;

#[derive(Clone)]
pub struct AirportService {
    api: ApiClient,
}

impl AirportService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn fetch_airports(&self) -> Result<Vec<Airport>> {
        self.api.get_json("/airports/fetch").await
    }

    /// Compensation amount the API computes for a route.
    pub async fn compensation(&self, departing: &str, destination: &str) -> Result<f64> {
        let request = self.compensation_request(departing, destination)?;
        self.api.send_json(request).await
    }

    fn compensation_request(&self, departing: &str, destination: &str) -> Result<RequestBuilder> {
        validate_airport_code("departing airport", departing)?;
        validate_airport_code("destination airport", destination)?;

        Ok(self
            .api
            .request(Method::POST, "/airports/compensation")?
            .query(&[
                ("departingAirportCode", departing),
                ("destinationAirportCode", destination),
            ]))
    }
}
