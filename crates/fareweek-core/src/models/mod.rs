//! Data models shared across the pipeline.

pub mod config;
pub mod trip;

pub use config::{ConfigLookup, Settings};
pub use trip::{ParsedTrip, TripRecord};
