//! Messages from spawned network tasks back to the orchestrator

use super::request_sequencer::RequestKind;
use crate::core::{GeoError, GeocodeResult};

#[derive(Debug)]
pub enum GeoEventKind {
    Suggestions {
        query: String,
        result: Result<Vec<GeocodeResult>, GeoError>,
    },
    Resolved {
        query: String,
        result: Result<GeocodeResult, GeoError>,
    },
}

/// A completed request, tagged with the sequence number it was issued under
#[derive(Debug)]
pub struct GeoEvent {
    pub seq: u64,
    pub kind: GeoEventKind,
}

impl GeoEvent {
    pub fn request_kind(&self) -> RequestKind {
        match self.kind {
            GeoEventKind::Suggestions { .. } => RequestKind::Search,
            GeoEventKind::Resolved { .. } => RequestKind::Resolve,
        }
    }
}

/// What applying an event did to session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Suggestions were replaced (possibly with an empty list)
    SuggestionsUpdated,
    /// The marker moved to the resolved coordinate
    MarkerMoved,
    /// Resolution failed or matched the current marker; marker unchanged
    MarkerUnchanged,
    /// Superseded by a newer request and ignored
    Stale,
}
