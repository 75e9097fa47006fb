use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the globe in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Parse "lat,lng" as used by the GEO_PIN_LOCATION override
    pub fn parse_pair(text: &str) -> Option<Self> {
        let (lat, lng) = text.split_once(',')?;
        let lat: f64 = lat.trim().parse().ok()?;
        let lng: f64 = lng.trim().parse().ok()?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return None;
        }
        Some(Self { lat, lng })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

/// A pin drawn on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Stable per logical pin; replacements keep the same id
    pub id: String,
    pub position: Coordinate,
    pub icon: String,
    /// (width, height)
    pub size: (u16, u16),
}

impl Marker {
    pub fn new(id: impl Into<String>, position: Coordinate) -> Self {
        Self {
            id: id.into(),
            position,
            icon: "📍".to_string(),
            size: (32, 32),
        }
    }

    /// Same pin, new place
    pub fn moved_to(&self, position: Coordinate) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }
}

/// One candidate returned by the geocoder
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub lat: f64,
    pub lng: f64,
}

impl GeocodeResult {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}
