//! Common test setup functions.

use std::path::Path;

use dataset_store::{DatasetStore, StoreConfig};
use log_generator::{BehaviorModel, GeneratorConfig, LogGenerator};
use tempfile::TempDir;

use crate::fixtures::anchor;

/// Test context with a dataset store rooted in a temporary directory.
///
/// The directory is removed when the context is dropped.
pub struct TestContext {
    pub dir: TempDir,
    pub store: DatasetStore,
}

impl TestContext {
    /// Store that generates `rows` events with the default model and seed 42.
    pub fn new(rows: i64) -> Self {
        Self::with_generation(GeneratorConfig {
            rows,
            ..GeneratorConfig::default()
        })
    }

    pub fn with_generation(generation: GeneratorConfig) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = DatasetStore::new(
            StoreConfig::with_path(dir.path().join("ecommerce_search_logs.csv")),
            generator(),
            generation,
        );
        Self { dir, store }
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Overwrites the dataset file with raw content.
    pub fn write_raw(&self, content: &str) {
        std::fs::write(self.path(), content).expect("Failed to write dataset file");
    }

    pub fn read_raw(&self) -> String {
        std::fs::read_to_string(self.path()).expect("Failed to read dataset file")
    }
}

/// Default-model generator pinned to the fixture anchor.
pub fn generator() -> LogGenerator {
    LogGenerator::new(&BehaviorModel::default())
        .expect("Default behavior model is valid")
        .with_anchor(anchor())
}
