//! Search analytics over [`search_core::SearchEvent`] slices.
//!
//! Filtering, global and per-query rollups, time series, opportunity
//! detection, tuning suggestions and a simulated A/B test. Every function
//! takes the events by reference and returns fresh values.

pub mod experiment;
pub mod filter;
pub mod opportunity;
pub mod report;
pub mod rollup;
pub mod stats;
pub mod timeseries;
pub mod tuning;

pub use experiment::{simulate_ab, ExperimentConfig, ExperimentResult, ExperimentTarget};
pub use filter::{filter, FilterCriteria};
pub use opportunity::{detect_opportunities, OpportunityThresholds};
pub use report::{DashboardReport, ReportConfig};
pub use rollup::{aggregate, aggregate_by_query, top_queries, QueryRollup, QuerySortKey, Rollup};
pub use timeseries::{aggregate_by_time_bucket, aggregate_by_time_bucket_in, BucketWidth, TimeBucket};
pub use tuning::{query_variants, suggest_tuning, SuggestionKind, TuningSuggestion};
