//! Bounds shared by generation, validation, and aggregation.
//!
//! The `#[validate]` derive macro requires literal values in attributes,
//! so some bounds are duplicated there. Keep both in sync when modifying.

// === Click model ===

/// Lowest rank a clicked result can have.
pub const MIN_CLICK_POSITION: u8 = 1;

/// Highest rank a clicked result can have (first results page).
pub const MAX_CLICK_POSITION: u8 = 9;

/// Floor applied to per-event click probability.
pub const MIN_CLICK_PROB: f64 = 0.05;

/// Ceiling applied to per-event click probability.
pub const MAX_CLICK_PROB: f64 = 0.95;

// === Generation ===

/// Maximum rows a single generation run may produce.
pub const MAX_GENERATED_ROWS: i64 = 1_000_000;

/// Maximum look-back window for generated timestamps (10 years).
pub const MAX_DAYS_BACK: i64 = 3_650;

// === Aggregation ===

/// Maximum buckets a time-bucketed rollup may emit.
///
/// Zero-filling an hourly series over a wide range grows quickly.
pub const MAX_TIME_BUCKETS: usize = 100_000;

/// Upper bound for the dashboard top-N query table.
pub const MAX_TOP_N: usize = 30;

// === Money ===

/// Tolerance when comparing revenue against price.
pub const MONEY_EPSILON: f64 = 1e-6;

/// Rounds a monetary amount to cents.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(12.345_6), 12.35);
        assert_eq!(round_cents(40.0), 40.0);
        assert_eq!(round_cents(0.004), 0.0);
    }
}
