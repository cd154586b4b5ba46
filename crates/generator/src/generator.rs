//! Seeded synthetic search log generator.

use std::time::Instant;

use chrono::{DateTime, Duration, Timelike, Utc};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use search_core::limits::{
    round_cents, MAX_CLICK_POSITION, MAX_CLICK_PROB, MAX_DAYS_BACK, MAX_GENERATED_ROWS,
    MIN_CLICK_POSITION, MIN_CLICK_PROB,
};
use search_core::{Error, Result, SearchEvent};
use telemetry::metrics;
use tracing::info;
use validator::Validate;

use crate::behavior::{BehaviorModel, CompiledModel};
use crate::catalog::{CATALOG, COUNTRIES, DEVICES};
use crate::config::GeneratorConfig;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Produces synthetic search events under a fixed behavior model.
///
/// Timestamps are placed relative to an anchor instant. Output is a pure
/// function of (anchor, model, n_rows, days_back, seed).
#[derive(Debug, Clone)]
pub struct LogGenerator {
    model: CompiledModel,
    anchor: DateTime<Utc>,
}

impl LogGenerator {
    /// Creates a generator anchored at the current minute.
    pub fn new(model: &BehaviorModel) -> Result<Self> {
        Ok(Self {
            model: model.compile()?,
            anchor: truncate_to_minute(Utc::now()),
        })
    }

    /// Pins the anchor instant (truncated to the minute).
    pub fn with_anchor(mut self, anchor: DateTime<Utc>) -> Self {
        self.anchor = truncate_to_minute(anchor);
        self
    }

    pub fn anchor(&self) -> DateTime<Utc> {
        self.anchor
    }

    pub fn model(&self) -> &CompiledModel {
        &self.model
    }

    /// Generates a dataset from a run configuration.
    pub fn generate_from(&self, config: &GeneratorConfig) -> Result<Vec<SearchEvent>> {
        config
            .validate()
            .map_err(|e| Error::invalid_argument(format!("generator config: {}", e)))?;
        self.generate(config.rows, config.days_back, config.seed)
    }

    /// Generates `n_rows` events within `days_back` days of the anchor.
    pub fn generate(&self, n_rows: i64, days_back: i64, seed: u64) -> Result<Vec<SearchEvent>> {
        if n_rows < 0 {
            return Err(Error::invalid_argument(format!(
                "n_rows must be >= 0, got {}",
                n_rows
            )));
        }
        if days_back < 0 {
            return Err(Error::invalid_argument(format!(
                "days_back must be >= 0, got {}",
                days_back
            )));
        }
        if n_rows > MAX_GENERATED_ROWS {
            return Err(Error::invalid_argument(format!(
                "n_rows {} exceeds limit {}",
                n_rows, MAX_GENERATED_ROWS
            )));
        }
        if days_back > MAX_DAYS_BACK {
            return Err(Error::invalid_argument(format!(
                "days_back {} exceeds limit {}",
                days_back, MAX_DAYS_BACK
            )));
        }

        let started = Instant::now();
        let mut rng = StdRng::seed_from_u64(seed);
        let window_minutes = days_back * MINUTES_PER_DAY;

        let events: Vec<SearchEvent> = (0..n_rows)
            .map(|_| self.draw_event(&mut rng, window_minutes))
            .collect::<Result<_>>()?;

        let m = metrics();
        m.events_generated.inc_by(events.len() as u64);
        m.datasets_generated.inc();
        m.generate_latency_ms
            .observe(started.elapsed().as_millis() as u64);

        info!(
            rows = events.len(),
            days_back,
            seed,
            anchor = %self.anchor,
            "Generated synthetic search logs"
        );

        Ok(events)
    }

    fn draw_event(&self, rng: &mut StdRng, window_minutes: i64) -> Result<SearchEvent> {
        let behavior = self.model.model();

        let entry = CATALOG
            .choose(rng)
            .ok_or_else(|| Error::internal("query catalog is empty"))?;
        let normalized_query = entry.query.to_string();
        let query = if rng.random_bool(behavior.variant_prob) {
            entry
                .variants
                .choose(rng)
                .map(|v| v.to_string())
                .unwrap_or_else(|| normalized_query.clone())
        } else {
            normalized_query.clone()
        };

        let offset = rng.random_range(0..=window_minutes);
        let timestamp = self.anchor - Duration::minutes(offset);

        let session_id = uuid::Builder::from_random_bytes(rng.random())
            .into_uuid()
            .to_string();
        let user_id = format!("U{}", rng.random_range(1000..5000));

        let click_prob = self
            .model
            .raw_click_prob(entry.category, &normalized_query)
            .clamp(MIN_CLICK_PROB, MAX_CLICK_PROB);
        let mut clicked = rng.random_bool(click_prob);
        let mut click_position =
            clicked.then(|| rng.random_range(MIN_CLICK_POSITION..=MAX_CLICK_POSITION));

        let mut purchased = clicked && rng.random_bool(self.model.purchase_prob(entry.category));
        let mut added_to_cart = purchased || (clicked && rng.random_bool(behavior.cart_prob));

        let profile = self.model.profile(entry.category);
        let mut price = purchased
            .then(|| round_cents(rng.random_range(profile.min_price..=profile.max_price)));

        // A zero-result page wipes out everything downstream of the search.
        let no_result = rng.random_bool(behavior.no_result_prob);
        if no_result {
            clicked = false;
            click_position = None;
            added_to_cart = false;
            purchased = false;
            price = None;
        }

        let product_id = purchased.then(|| format!("P{}", rng.random_range(10_000..100_000)));
        let country = COUNTRIES.choose(rng).map(|c| c.to_string());
        let device = DEVICES.choose(rng).map(|d| d.to_string());

        Ok(SearchEvent {
            timestamp,
            session_id,
            user_id,
            query,
            normalized_query,
            category: entry.category,
            clicked,
            click_position,
            added_to_cart,
            purchased,
            product_id,
            price,
            revenue: price.unwrap_or(0.0),
            no_result,
            country,
            device,
        })
    }
}

fn truncate_to_minute(t: DateTime<Utc>) -> DateTime<Utc> {
    t.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t)
}
