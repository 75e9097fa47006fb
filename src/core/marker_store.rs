use super::marker::Marker;
use tracing::debug;

/// Holds the markers shown on the map.
///
/// This app always shows exactly one pin, so the store is built from an
/// initial marker and every update replaces the whole list.
#[derive(Debug, Clone)]
pub struct MarkerStore {
    markers: Vec<Marker>,
    revision: u64,
}

impl MarkerStore {
    pub fn new(initial: Marker) -> Self {
        Self {
            markers: vec![initial],
            revision: 0,
        }
    }

    /// Replace the current marker list with `marker`.
    ///
    /// Returns false when the store already held exactly this marker, in
    /// which case nothing (including the revision) changes.
    pub fn replace(&mut self, marker: Marker) -> bool {
        if self.markers.len() == 1 && self.markers[0] == marker {
            return false;
        }
        debug!(target: "marker", "Replacing marker {} at {}", marker.id, marker.position);
        self.markers = vec![marker];
        self.revision += 1;
        true
    }

    pub fn current(&self) -> &[Marker] {
        &self.markers
    }

    /// The marker the map centers on
    pub fn primary(&self) -> &Marker {
        &self.markers[0]
    }

    /// Bumped on every observable change, lets the UI skip redraws
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
