//! Simulated A/B test of a ranking change.
//!
//! Events are split into control and treatment with a seeded RNG. In the
//! treatment arm, targeted queries get a relative CTR uplift: some unclicked
//! impressions become clicks, and those clicks convert at the query's
//! observed rate and price. The input slice is never modified.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use search_core::limits::{round_cents, MAX_CLICK_POSITION, MIN_CLICK_POSITION};
use search_core::{Error, Result, SearchEvent};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::opportunity::detect_opportunities;
use crate::rollup::{aggregate_by_query, QuerySortKey, Rollup};
use crate::stats::relative_change;

/// Offset of the uplift RNG seed from the assignment seed.
const UPLIFT_SEED_OFFSET: u64 = 0x9E37_79B9_7F4A_7C15;

/// Which queries receive the treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperimentTarget {
    #[default]
    Opportunities,
    AllQueries,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Fraction of events assigned to treatment, in (0, 1)
    #[serde(default = "default_treatment_share")]
    pub treatment_share: f64,
    /// Relative CTR uplift applied to targeted queries
    #[serde(default = "default_ctr_uplift")]
    pub ctr_uplift: f64,
    #[serde(default)]
    pub target: ExperimentTarget,
    #[serde(default = "default_experiment_seed")]
    pub seed: u64,
}

fn default_treatment_share() -> f64 {
    0.5
}

fn default_ctr_uplift() -> f64 {
    0.15
}

fn default_experiment_seed() -> u64 {
    7
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            treatment_share: default_treatment_share(),
            ctr_uplift: default_ctr_uplift(),
            target: ExperimentTarget::default(),
            seed: default_experiment_seed(),
        }
    }
}

impl ExperimentConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.treatment_share > 0.0 && self.treatment_share < 1.0) {
            return Err(Error::invalid_argument(format!(
                "treatment_share must be in (0, 1), got {}",
                self.treatment_share
            )));
        }
        if !self.ctr_uplift.is_finite() || self.ctr_uplift < 0.0 {
            return Err(Error::invalid_argument(format!(
                "ctr_uplift must be finite and non-negative, got {}",
                self.ctr_uplift
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResult {
    pub target_queries: Vec<String>,
    pub control: Rollup,
    pub treatment: Rollup,
    /// Relative change in CTR, treatment over control
    pub ctr_lift: f64,
    pub revenue_per_search_lift: f64,
}

/// Observed behavior of one targeted query.
#[derive(Debug, Clone, Copy)]
struct Baseline {
    /// Probability that an unclicked impression becomes a click
    extra_click_prob: f64,
    conversion_rate: f64,
    mean_price: Option<f64>,
}

impl Baseline {
    fn new(metrics: &Rollup, uplift: f64) -> Self {
        let ctr = metrics.click_through_rate;
        let extra_click_prob = if ctr >= 1.0 {
            0.0
        } else {
            (ctr * uplift / (1.0 - ctr)).min(1.0)
        };
        Self {
            extra_click_prob,
            conversion_rate: metrics.post_click_conversion_rate.clamp(0.0, 1.0),
            mean_price: metrics.mean_order_value(),
        }
    }
}

/// Runs the simulation.
pub fn simulate_ab(events: &[SearchEvent], config: &ExperimentConfig) -> Result<ExperimentResult> {
    config.validate()?;

    let by_query = aggregate_by_query(events, QuerySortKey::Searches);
    let targeted = match config.target {
        ExperimentTarget::Opportunities => detect_opportunities(&by_query),
        ExperimentTarget::AllQueries => by_query,
    };
    let baselines: BTreeMap<String, Baseline> = targeted
        .iter()
        .map(|q| {
            (
                q.normalized_query.clone(),
                Baseline::new(&q.metrics, config.ctr_uplift),
            )
        })
        .collect();

    // Arm membership depends only on (seed, treatment_share).
    let arms = assign_arms(events.len(), config);
    let mut uplift_rng = StdRng::seed_from_u64(config.seed.wrapping_add(UPLIFT_SEED_OFFSET));
    let mut control = Vec::new();
    let mut treatment = Vec::new();
    for (event, in_treatment) in events.iter().zip(arms) {
        if in_treatment {
            let mut event = event.clone();
            if let Some(baseline) = baselines.get(&event.normalized_query) {
                apply_uplift(&mut event, baseline, &mut uplift_rng);
            }
            treatment.push(event);
        } else {
            control.push(event);
        }
    }

    let control = Rollup::of(control);
    let treatment = Rollup::of(&treatment);
    let result = ExperimentResult {
        target_queries: baselines.into_keys().collect(),
        ctr_lift: relative_change(control.click_through_rate, treatment.click_through_rate),
        revenue_per_search_lift: relative_change(
            control.revenue_per_search,
            treatment.revenue_per_search,
        ),
        control,
        treatment,
    };

    info!(
        targets = result.target_queries.len(),
        control = result.control.total_searches,
        treatment = result.treatment.total_searches,
        ctr_lift = result.ctr_lift,
        "Simulated A/B test"
    );

    Ok(result)
}

/// Treatment flags, one per event, drawn from the experiment seed alone.
fn assign_arms(len: usize, config: &ExperimentConfig) -> Vec<bool> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    (0..len)
        .map(|_| rng.random_bool(config.treatment_share))
        .collect()
}

fn apply_uplift(event: &mut SearchEvent, baseline: &Baseline, rng: &mut StdRng) {
    if event.clicked || event.no_result {
        return;
    }
    if !rng.random_bool(baseline.extra_click_prob) {
        return;
    }

    event.clicked = true;
    event.click_position = Some(rng.random_range(MIN_CLICK_POSITION..=MAX_CLICK_POSITION));

    let Some(price) = baseline.mean_price else {
        return;
    };
    if rng.random_bool(baseline.conversion_rate) {
        let price = round_cents(price);
        event.added_to_cart = true;
        event.purchased = true;
        event.product_id = Some(format!("P{}", rng.random_range(10_000..100_000)));
        event.price = Some(price);
        event.revenue = price;
    }
}
