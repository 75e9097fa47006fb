#![allow(dead_code)]

use async_trait::async_trait;
use geo_pin::core::{Coordinate, GeoError, GeocodeResult};
use geo_pin::services::{LocationProvider, PermissionStatus};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

pub fn place(name: &str, lat: f64, lng: f64) -> GeocodeResult {
    GeocodeResult {
        formatted_address: name.to_string(),
        lat,
        lng,
    }
}

/// Answers from a fixed table and records every query it receives
#[derive(Default)]
pub struct ScriptedGeocoder {
    answers: HashMap<String, Result<Vec<GeocodeResult>, GeoError>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, query: &str, results: Vec<GeocodeResult>) -> Self {
        self.answers.insert(query.to_string(), Ok(results));
        self
    }

    pub fn fail(mut self, query: &str, err: GeoError) -> Self {
        self.answers.insert(query.to_string(), Err(err));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl geo_pin::api::Geocoder for ScriptedGeocoder {
    async fn search(&self, query: &str) -> Result<Vec<GeocodeResult>, GeoError> {
        self.calls.lock().unwrap().push(query.to_string());
        self.answers
            .get(query)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Each query blocks until the test releases it, so arrival order is
/// under the test's control
#[derive(Default)]
pub struct GatedGeocoder {
    gates: Mutex<HashMap<String, oneshot::Receiver<Vec<GeocodeResult>>>>,
}

impl GatedGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a gate for `query`; send on the returned sender to release it
    pub fn gate(&self, query: &str) -> oneshot::Sender<Vec<GeocodeResult>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(query.to_string(), rx);
        tx
    }
}

#[async_trait]
impl geo_pin::api::Geocoder for GatedGeocoder {
    async fn search(&self, query: &str) -> Result<Vec<GeocodeResult>, GeoError> {
        let gate = self.gates.lock().unwrap().remove(query);
        match gate {
            Some(rx) => rx
                .await
                .map_err(|_| GeoError::Network("gate dropped".to_string())),
            None => Ok(Vec::new()),
        }
    }
}

/// Location provider with a fixed answer that counts how often it is asked
pub struct FakeLocation {
    permission: PermissionStatus,
    position: Option<Coordinate>,
    requests: AtomicUsize,
}

impl FakeLocation {
    pub fn granted(position: Coordinate) -> Self {
        Self {
            permission: PermissionStatus::Granted,
            position: Some(position),
            requests: AtomicUsize::new(0),
        }
    }

    pub fn denied() -> Self {
        Self {
            permission: PermissionStatus::Denied,
            position: Some(Coordinate::new(1.0, 1.0)),
            requests: AtomicUsize::new(0),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            permission: PermissionStatus::Granted,
            position: None,
            requests: AtomicUsize::new(0),
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationProvider for FakeLocation {
    async fn request_foreground_permission(&self) -> PermissionStatus {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.permission
    }

    async fn current_position(&self) -> Result<Coordinate, GeoError> {
        self.position
            .ok_or_else(|| GeoError::ProviderUnavailable("no fix".to_string()))
    }
}
