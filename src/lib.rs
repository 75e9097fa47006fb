//! Interactive map search in the terminal: type a place, pick one of the
//! geocoder's suggestions and the map pin moves there.

pub mod api;
pub mod config;
pub mod core;
pub mod services;
pub mod ui;
pub mod utils;
pub mod widgets;
