use thiserror::Error;

/// Everything that can go wrong while geocoding or locating the device.
///
/// None of these are fatal. The orchestrator catches all of them and
/// degrades to "no change" with a log line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// Transport failure, non-success status or a body we could not parse
    #[error("network error: {0}")]
    Network(String),

    #[error("no results for '{query}'")]
    NotFound { query: String },

    #[error("location permission denied")]
    PermissionDenied,

    #[error("location provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Missing or invalid configuration (e.g. no API key)
    #[error("configuration error: {0}")]
    Config(String),
}

impl GeoError {
    /// Short stable name used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            GeoError::Network(_) => "network",
            GeoError::NotFound { .. } => "not_found",
            GeoError::PermissionDenied => "permission_denied",
            GeoError::ProviderUnavailable(_) => "provider_unavailable",
            GeoError::Config(_) => "config",
        }
    }
}

impl From<reqwest::Error> for GeoError {
    fn from(err: reqwest::Error) -> Self {
        GeoError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for GeoError {
    fn from(err: serde_json::Error) -> Self {
        GeoError::Network(format!("malformed response: {}", err))
    }
}
