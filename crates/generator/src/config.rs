//! Generation run configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// How many rows to generate, over what window, from which seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct GeneratorConfig {
    /// Number of events to generate
    #[serde(default = "default_rows")]
    #[validate(range(min = 0, max = 1_000_000))]
    pub rows: i64,
    /// Timestamps fall within this many days before the anchor
    #[serde(default = "default_days_back")]
    #[validate(range(min = 0, max = 3650))]
    pub days_back: i64,
    /// RNG seed; identical seeds reproduce identical datasets
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_rows() -> i64 {
    800
}

fn default_days_back() -> i64 {
    30
}

fn default_seed() -> u64 {
    42
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            days_back: default_days_back(),
            seed: default_seed(),
        }
    }
}
