//! Dashboard report assembled from a filtered event slice.

use search_core::limits::MAX_TOP_N;
use search_core::{Result, SearchEvent};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::experiment::{simulate_ab, ExperimentConfig, ExperimentResult};
use crate::opportunity::detect_opportunities;
use crate::rollup::{aggregate, aggregate_by_query, QueryRollup, QuerySortKey, Rollup};
use crate::timeseries::{aggregate_by_time_bucket, BucketWidth, TimeBucket};
use crate::tuning::{suggest_tuning, TuningSuggestion};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Rows in the top-queries table, clamped to [1, MAX_TOP_N]
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default)]
    pub sort_by: QuerySortKey,
    #[serde(default)]
    pub bucket: BucketWidth,
    #[serde(default = "default_run_experiment")]
    pub run_experiment: bool,
    #[serde(default)]
    pub experiment: ExperimentConfig,
}

fn default_top_n() -> usize {
    10
}

fn default_run_experiment() -> bool {
    true
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            sort_by: QuerySortKey::default(),
            bucket: BucketWidth::default(),
            run_experiment: default_run_experiment(),
            experiment: ExperimentConfig::default(),
        }
    }
}

impl ReportConfig {
    pub fn effective_top_n(&self) -> usize {
        self.top_n.clamp(1, MAX_TOP_N)
    }
}

/// Everything the dashboard renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub rows: usize,
    pub summary: Rollup,
    pub top_queries: Vec<QueryRollup>,
    pub series: Vec<TimeBucket>,
    pub opportunities: Vec<QueryRollup>,
    pub suggestions: Vec<TuningSuggestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experiment: Option<ExperimentResult>,
}

impl DashboardReport {
    pub fn build(events: &[SearchEvent], config: &ReportConfig) -> Result<Self> {
        // Opportunities use the full table; only the display is truncated.
        let by_query = aggregate_by_query(events, config.sort_by);
        let opportunities = detect_opportunities(&by_query);

        let mut top_queries = by_query;
        top_queries.truncate(config.effective_top_n());

        let experiment = if config.run_experiment {
            Some(simulate_ab(events, &config.experiment)?)
        } else {
            None
        };

        let report = Self {
            rows: events.len(),
            summary: aggregate(events),
            top_queries,
            series: aggregate_by_time_bucket(events, config.bucket)?,
            opportunities,
            suggestions: suggest_tuning(events),
            experiment,
        };

        info!(
            rows = report.rows,
            queries = report.top_queries.len(),
            opportunities = report.opportunities.len(),
            buckets = report.series.len(),
            "Built dashboard report"
        );

        Ok(report)
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}
