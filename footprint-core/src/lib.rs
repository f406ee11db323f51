//! Footprint Core - Registry, signals and report model
//!
//! This crate holds everything that does not touch the network:
//! - Platform registry with URL templates
//! - Probe results produced per platform
//! - Stylometry and cross-profile similarity signals
//! - Confidence scoring, risk tiers and report narrative

pub mod config;
pub mod probe;
pub mod registry;
pub mod report;
pub mod signals;

pub use config::*;
pub use probe::*;
pub use registry::*;
pub use report::*;
pub use signals::*;
