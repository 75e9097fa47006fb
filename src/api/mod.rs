//! External geocoding API
//!
//! `Geocoder` is the seam the search orchestrator talks to; `OpenCageClient`
//! is the HTTP implementation.

pub mod client;

use crate::core::{GeoError, GeocodeResult};
use async_trait::async_trait;

pub use client::OpenCageClient;

/// Free-text place lookup
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// All candidates for `query`, in the order the service ranked them.
    /// Zero matches is an empty vector, not an error.
    async fn search(&self, query: &str) -> Result<Vec<GeocodeResult>, GeoError>;

    /// Best candidate for `query`, or `NotFound`
    async fn resolve_first(&self, query: &str) -> Result<GeocodeResult, GeoError> {
        self.search(query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| GeoError::NotFound {
                query: query.to_string(),
            })
    }
}
