//! Opportunity detection: above-median traffic with below-median engagement.

use serde::{Deserialize, Serialize};

use crate::rollup::QueryRollup;
use crate::stats::median;

/// Thresholds derived from a per-query table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpportunityThresholds {
    pub median_searches: f64,
    pub median_ctr: f64,
}

impl OpportunityThresholds {
    pub fn from_rollups(rollups: &[QueryRollup]) -> Self {
        let searches: Vec<f64> = rollups.iter().map(|r| r.searches() as f64).collect();
        let ctrs: Vec<f64> = rollups.iter().map(QueryRollup::ctr).collect();
        Self {
            median_searches: median(&searches),
            median_ctr: median(&ctrs),
        }
    }

    pub fn qualifies(&self, rollup: &QueryRollup) -> bool {
        rollup.searches() as f64 >= self.median_searches && rollup.ctr() < self.median_ctr
    }
}

/// Queries with `searches >= median(searches)` and `ctr < median(ctr)`.
///
/// Keeps the input order.
pub fn detect_opportunities(rollups: &[QueryRollup]) -> Vec<QueryRollup> {
    let thresholds = OpportunityThresholds::from_rollups(rollups);
    rollups
        .iter()
        .filter(|r| thresholds.qualifies(r))
        .cloned()
        .collect()
}
