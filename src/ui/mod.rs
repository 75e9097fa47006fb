//! Terminal user interface
//!
//! The event loop and the map canvas. All session logic lives in
//! `services::SearchOrchestrator`; this module only draws it and feeds it
//! keystrokes.

pub mod app;
pub mod map_surface;

pub use app::MapSearchApp;
pub use map_surface::{MapSurface, MapSurfaceProps, Viewport};
