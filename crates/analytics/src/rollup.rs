//! Global and per-query rollups.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use search_core::{Category, SearchEvent};
use serde::{Deserialize, Serialize};
use telemetry::metrics;

use crate::stats::ratio;

/// Aggregated counts, rates, and revenue over a set of events.
///
/// Rates are fractions in [0, 1]. Every ratio with a zero denominator is 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rollup {
    pub total_searches: u64,
    pub clicks: u64,
    pub add_to_carts: u64,
    pub purchases: u64,
    pub no_results: u64,
    pub click_through_rate: f64,
    pub add_to_cart_rate: f64,
    pub purchase_rate: f64,
    /// purchases / clicks
    pub post_click_conversion_rate: f64,
    pub no_result_rate: f64,
    pub total_revenue: f64,
    pub revenue_per_search: f64,
    /// Mean rank of clicked results
    pub avg_click_position: f64,
}

/// Running totals, finished into a [`Rollup`].
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    searches: u64,
    clicks: u64,
    add_to_carts: u64,
    purchases: u64,
    no_results: u64,
    revenue: f64,
    click_position_sum: u64,
}

impl Tally {
    fn add(&mut self, event: &SearchEvent) {
        self.searches += 1;
        self.clicks += u64::from(event.clicked);
        self.add_to_carts += u64::from(event.added_to_cart);
        self.purchases += u64::from(event.purchased);
        self.no_results += u64::from(event.no_result);
        self.revenue += event.revenue;
        self.click_position_sum += event.click_position.map_or(0, u64::from);
    }

    fn finish(self) -> Rollup {
        let searches = self.searches as f64;
        let clicks = self.clicks as f64;
        Rollup {
            total_searches: self.searches,
            clicks: self.clicks,
            add_to_carts: self.add_to_carts,
            purchases: self.purchases,
            no_results: self.no_results,
            click_through_rate: ratio(clicks, searches),
            add_to_cart_rate: ratio(self.add_to_carts as f64, searches),
            purchase_rate: ratio(self.purchases as f64, searches),
            post_click_conversion_rate: ratio(self.purchases as f64, clicks),
            no_result_rate: ratio(self.no_results as f64, searches),
            total_revenue: self.revenue,
            revenue_per_search: ratio(self.revenue, searches),
            avg_click_position: ratio(self.click_position_sum as f64, clicks),
        }
    }
}

impl Rollup {
    /// Rolls up any sequence of events.
    pub fn of<'a>(events: impl IntoIterator<Item = &'a SearchEvent>) -> Self {
        let mut tally = Tally::default();
        for event in events {
            tally.add(event);
        }
        tally.finish()
    }

    /// Mean price of purchased items, if anything was purchased.
    pub fn mean_order_value(&self) -> Option<f64> {
        (self.purchases > 0).then(|| self.total_revenue / self.purchases as f64)
    }
}

/// Summary metrics over all events.
pub fn aggregate(events: &[SearchEvent]) -> Rollup {
    metrics().rollups_computed.inc();
    Rollup::of(events)
}

/// Rollup for one normalized query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRollup {
    pub normalized_query: String,
    /// Category of the first event seen for this query
    pub category: Category,
    #[serde(flatten)]
    pub metrics: Rollup,
}

impl QueryRollup {
    pub fn searches(&self) -> u64 {
        self.metrics.total_searches
    }

    pub fn ctr(&self) -> f64 {
        self.metrics.click_through_rate
    }
}

/// Descending sort key for per-query tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuerySortKey {
    #[default]
    Searches,
    Revenue,
    Purchases,
    ClickThroughRate,
    NoResultRate,
}

impl QuerySortKey {
    fn compare(&self, a: &Rollup, b: &Rollup) -> Ordering {
        match self {
            Self::Searches => b.total_searches.cmp(&a.total_searches),
            Self::Revenue => b.total_revenue.total_cmp(&a.total_revenue),
            Self::Purchases => b.purchases.cmp(&a.purchases),
            Self::ClickThroughRate => b.click_through_rate.total_cmp(&a.click_through_rate),
            Self::NoResultRate => b.no_result_rate.total_cmp(&a.no_result_rate),
        }
    }
}

/// Groups events by normalized query.
///
/// Sorted descending by `sort_by`; ties go to the lexically smaller query.
pub fn aggregate_by_query(events: &[SearchEvent], sort_by: QuerySortKey) -> Vec<QueryRollup> {
    let mut groups: BTreeMap<&str, (Category, Tally)> = BTreeMap::new();
    for event in events {
        groups
            .entry(event.normalized_query.as_str())
            .or_insert_with(|| (event.category, Tally::default()))
            .1
            .add(event);
    }

    let mut rollups: Vec<QueryRollup> = groups
        .into_iter()
        .map(|(query, (category, tally))| QueryRollup {
            normalized_query: query.to_string(),
            category,
            metrics: tally.finish(),
        })
        .collect();

    rollups.sort_by(|a, b| {
        sort_by
            .compare(&a.metrics, &b.metrics)
            .then_with(|| a.normalized_query.cmp(&b.normalized_query))
    });

    metrics().rollups_computed.inc();
    rollups
}

/// The first `n` rows of the per-query table.
pub fn top_queries(events: &[SearchEvent], sort_by: QuerySortKey, n: usize) -> Vec<QueryRollup> {
    let mut rollups = aggregate_by_query(events, sort_by);
    rollups.truncate(n);
    rollups
}
