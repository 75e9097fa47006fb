//! Core session types
//!
//! Coordinates, markers, the marker store and the search state machine's
//! data. Nothing in here talks to the network or the terminal.

pub mod error;
pub mod marker;
pub mod marker_store;
pub mod search_state;

pub use error::GeoError;
pub use marker::{Coordinate, GeocodeResult, Marker};
pub use marker_store::MarkerStore;
pub use search_state::{SearchPhase, SearchState};
