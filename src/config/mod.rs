//! Configuration module
//!
//! Settings file handling, environment overrides and the defaults that
//! seed the marker, the map and the geocoder.

pub mod config;

pub use config::Config;
