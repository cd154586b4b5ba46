//! Shared helpers for the workspace integration tests.

pub mod fixtures;
pub mod setup;
