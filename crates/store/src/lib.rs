//! Dataset persistence for synthetic search logs.
//!
//! The dataset is a CSV file with a header row. Loading is idempotent and
//! safe to retry: when the file is missing, empty, or unreadable, a fresh
//! synthetic dataset is generated and written in its place.

pub mod config;
pub mod dataset;
pub mod enrichment;
pub mod record;
pub mod store;

pub use config::StoreConfig;
pub use dataset::{Dataset, DatasetSource, RegenerationReason};
pub use enrichment::PriceEnricher;
pub use record::{EventRecord, COLUMNS};
pub use store::DatasetStore;
