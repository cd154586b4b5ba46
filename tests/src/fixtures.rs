//! Test fixtures and event builders.

use chrono::{DateTime, Duration, TimeZone, Utc};
use search_core::{Category, SearchEvent};

/// Fixed anchor so generated datasets are reproducible across runs.
pub fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
}

/// A search that showed results but got no click.
pub fn search(query: &str, category: Category) -> SearchEvent {
    SearchEvent {
        timestamp: anchor() - Duration::hours(1),
        session_id: "00000000-0000-4000-8000-000000000000".into(),
        user_id: "U1000".into(),
        query: query.into(),
        normalized_query: query.into(),
        category,
        clicked: false,
        click_position: None,
        added_to_cart: false,
        purchased: false,
        product_id: None,
        price: None,
        revenue: 0.0,
        no_result: false,
        country: Some("Canada".into()),
        device: Some("mobile".into()),
    }
}

/// A search that got a click at `position`.
pub fn click(query: &str, category: Category, position: u8) -> SearchEvent {
    SearchEvent {
        clicked: true,
        click_position: Some(position),
        ..search(query, category)
    }
}

/// A search that ended in a purchase at `price`.
pub fn purchase(query: &str, category: Category, price: f64) -> SearchEvent {
    SearchEvent {
        added_to_cart: true,
        purchased: true,
        product_id: Some("P12345".into()),
        price: Some(price),
        revenue: price,
        ..click(query, category, 1)
    }
}

/// A search that returned an empty result page.
pub fn no_result(query: &str, category: Category) -> SearchEvent {
    SearchEvent {
        no_result: true,
        ..search(query, category)
    }
}

/// Moves an event to a given UTC day.
pub fn on_day(mut event: SearchEvent, year: i32, month: u32, day: u32) -> SearchEvent {
    event.timestamp = Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap();
    event
}

/// Generate `n` copies of an event.
pub fn repeat(n: usize, event: SearchEvent) -> Vec<SearchEvent> {
    vec![event; n]
}
