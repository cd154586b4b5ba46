//! Price and revenue enrichment for rows persisted without them.
//!
//! Price derives from the row's category list price (midpoint of the
//! behavior model's range) with ±10% noise from a fixed-seed RNG, so the
//! same file always enriches to the same values.

use std::collections::BTreeMap;

use log_generator::CompiledModel;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use search_core::limits::round_cents;
use search_core::Category;

use crate::record::EventRecord;

/// Seed for enrichment noise.
pub const ENRICHMENT_SEED: u64 = 123;

/// List price for rows whose category is unknown.
pub const FALLBACK_BASE_PRICE: f64 = 50.0;

/// Fills in missing price/revenue on loaded rows.
pub struct PriceEnricher {
    base_prices: BTreeMap<Category, f64>,
    rng: StdRng,
}

impl PriceEnricher {
    /// Creates an enricher using the model's category price ranges.
    pub fn new(model: &CompiledModel) -> Self {
        let base_prices = Category::ALL
            .iter()
            .map(|&c| (c, model.profile(c).base_price()))
            .collect();
        Self {
            base_prices,
            rng: StdRng::seed_from_u64(ENRICHMENT_SEED),
        }
    }

    /// List price for a raw category string.
    pub fn base_price(&self, category: &str) -> f64 {
        category
            .parse::<Category>()
            .ok()
            .and_then(|c| self.base_prices.get(&c).copied())
            .unwrap_or(FALLBACK_BASE_PRICE)
    }

    /// Enrich a single row. Returns true if price/revenue were derived.
    ///
    /// Rows with revenue are left alone, except that a purchase recorded
    /// without a price takes its revenue as the price.
    pub fn enrich(&mut self, record: &mut EventRecord) -> bool {
        if let Some(revenue) = record.revenue {
            if record.purchased && record.price.is_none() {
                record.price = Some(revenue);
            }
            return false;
        }

        // Always advance the RNG so a row's noise depends only on its position.
        let factor = self.rng.random_range(0.9..=1.1);
        if record.purchased {
            let price = record
                .price
                .unwrap_or_else(|| round_cents(self.base_price(&record.category) * factor));
            record.price = Some(price);
            record.revenue = Some(price);
        } else {
            record.price = None;
            record.revenue = Some(0.0);
        }
        true
    }

    /// Enrich rows in file order. Returns how many were derived.
    pub fn enrich_batch(&mut self, records: &mut [EventRecord]) -> usize {
        records
            .iter_mut()
            .map(|r| self.enrich(r))
            .filter(|&enriched| enriched)
            .count()
    }
}
