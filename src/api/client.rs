use super::Geocoder;
use crate::config::config::GeocodingConfig;
use crate::core::{GeoError, GeocodeResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, trace};

pub const DEFAULT_ENDPOINT: &str = "https://api.opencagedata.com/geocode/v1/json";

#[derive(Debug, Deserialize)]
struct OpenCageResponse {
    #[serde(default)]
    results: Vec<OpenCageResult>,
    #[serde(default)]
    status: Option<OpenCageStatus>,
}

#[derive(Debug, Deserialize)]
struct OpenCageResult {
    formatted: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct OpenCageStatus {
    code: u16,
    message: String,
}

/// Parse an OpenCage JSON body into results, preserving response order
pub fn parse_response(body: &str) -> Result<Vec<GeocodeResult>, GeoError> {
    let response: OpenCageResponse = serde_json::from_str(body)?;
    Ok(response
        .results
        .into_iter()
        .map(|r| GeocodeResult {
            formatted_address: r.formatted,
            lat: r.geometry.lat,
            lng: r.geometry.lng,
        })
        .collect())
}

/// Pull the human-readable reason out of an error body, if OpenCage sent one
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<OpenCageResponse>(body) {
        Ok(OpenCageResponse {
            status: Some(s), ..
        }) => format!("HTTP {}: {}", s.code, s.message),
        _ => format!("HTTP {}", status.as_u16()),
    }
}

#[derive(Clone)]
pub struct OpenCageClient {
    endpoint: String,
    api_key: String,
    limit: Option<u32>,
    client: reqwest::Client,
}

impl OpenCageClient {
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self, GeoError> {
        Self::build(endpoint, api_key, None, None)
    }

    pub fn from_config(config: &GeocodingConfig) -> Result<Self, GeoError> {
        let api_key = config.api_key.as_deref().ok_or_else(|| {
            GeoError::Config(
                "no OpenCage API key; set OPENCAGE_API_KEY or geocoding.api_key".to_string(),
            )
        })?;
        Self::build(
            &config.endpoint,
            api_key,
            config.limit,
            Some(Duration::from_millis(config.timeout_ms)),
        )
    }

    fn build(
        endpoint: &str,
        api_key: &str,
        limit: Option<u32>,
        timeout: Option<Duration>,
    ) -> Result<Self, GeoError> {
        if api_key.trim().is_empty() {
            return Err(GeoError::Config("OpenCage API key is empty".to_string()));
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("geo-pin/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            limit,
            client: builder.build()?,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Geocoder for OpenCageClient {
    async fn search(&self, query: &str) -> Result<Vec<GeocodeResult>, GeoError> {
        debug!(target: "geocode", "GET {} q={:?}", self.endpoint, query);

        let mut request = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("key", self.api_key.as_str())]);
        if let Some(limit) = self.limit {
            request = request.query(&[("limit", limit)]);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GeoError::Network(error_message(status, &body)));
        }

        let results = parse_response(&body)?;
        trace!(target: "geocode", "{} result(s) for {:?}", results.len(), query);
        Ok(results)
    }
}
