//! Utility functions and helpers
//!
//! Logging plumbing, application paths and the keystroke debouncer.

pub mod app_paths;
pub mod debouncer;
pub mod dual_logging;
pub mod logging;
