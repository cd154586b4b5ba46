//! Internal telemetry for the search analytics workspace.
//!
//! Structured logging via `tracing` plus in-process counters that the
//! binary dumps at the end of a run.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::*;
pub use tracing_setup::*;
