//! Predicate filtering over search events.

use chrono::NaiveDate;
use search_core::{contains_ignore_case, Category, SearchEvent};
use serde::{Deserialize, Serialize};
use telemetry::metrics;
use tracing::{debug, warn};

/// Conjunction of optional predicates.
///
/// Empty lists and `None` mean "no restriction". Dates are inclusive and
/// compared on the UTC calendar date of the event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub devices: Vec<String>,
    /// Case-insensitive substring of the raw query
    #[serde(default)]
    pub query_contains: Option<String>,
}

impl FilterCriteria {
    pub fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.categories = categories.into_iter().collect();
        self
    }

    pub fn with_countries<S: Into<String>>(mut self, countries: impl IntoIterator<Item = S>) -> Self {
        self.countries = countries.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_devices<S: Into<String>>(mut self, devices: impl IntoIterator<Item = S>) -> Self {
        self.devices = devices.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_query(mut self, text: impl Into<String>) -> Self {
        self.query_contains = Some(text.into());
        self
    }

    fn query_needle(&self) -> Option<&str> {
        self.query_contains
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }

    /// True when no predicate restricts anything.
    pub fn is_unrestricted(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && self.categories.is_empty()
            && self.countries.is_empty()
            && self.devices.is_empty()
            && self.query_needle().is_none()
    }

    /// Whether a single event satisfies every predicate.
    pub fn matches(&self, event: &SearchEvent) -> bool {
        let date = event.date();
        if self.start_date.is_some_and(|start| date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| date > end) {
            return false;
        }
        if !self.categories.is_empty() && !self.categories.contains(&event.category) {
            return false;
        }
        if !member(&self.countries, event.country.as_deref()) {
            return false;
        }
        if !member(&self.devices, event.device.as_deref()) {
            return false;
        }
        match self.query_needle() {
            Some(needle) => contains_ignore_case(&event.query, needle),
            None => true,
        }
    }
}

/// Set membership where an empty set admits everything, including absent values.
fn member(allowed: &[String], value: Option<&str>) -> bool {
    allowed.is_empty() || value.is_some_and(|v| allowed.iter().any(|a| a == v))
}

/// Returns the matching events in their original order.
///
/// No match is not an error: the result is simply empty and aggregates
/// over it are all zero.
pub fn filter(events: &[SearchEvent], criteria: &FilterCriteria) -> Vec<SearchEvent> {
    if criteria.is_unrestricted() {
        return events.to_vec();
    }

    let matched: Vec<SearchEvent> = events
        .iter()
        .filter(|e| criteria.matches(e))
        .cloned()
        .collect();

    if matched.is_empty() && !events.is_empty() {
        metrics().empty_filter_results.inc();
        warn!(?criteria, "No events match the selected filters");
    } else {
        debug!(kept = matched.len(), of = events.len(), "Filtered events");
    }

    matched
}
