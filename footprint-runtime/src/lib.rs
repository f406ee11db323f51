//! Footprint Runtime
//!
//! Drives a query across the whole registry:
//! - Bounded fan-out of probes and follow-up extractions
//! - Single merge point collecting results in completion order
//! - Engine assembling signals and the final report

pub mod engine;
pub mod scheduler;
pub mod settings;

#[cfg(test)]
pub(crate) mod mock;

pub use engine::*;
pub use scheduler::*;
pub use settings::*;
