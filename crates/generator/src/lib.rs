//! Synthetic e-commerce search log generation.
//!
//! A single-pass generator: each row draws a catalog query, optionally
//! misspells it, then walks the click → cart → purchase funnel using the
//! per-category parameters of a [`BehaviorModel`].

pub mod behavior;
pub mod catalog;
pub mod config;
pub mod generator;

pub use behavior::{BehaviorModel, CategoryProfile, CompiledModel};
pub use catalog::canonical_query;
pub use config::GeneratorConfig;
pub use generator::LogGenerator;
