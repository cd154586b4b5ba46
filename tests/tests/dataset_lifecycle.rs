//! Dataset generation, persistence and regenerate-on-failure loading.
//!
//! Every test works in its own temporary directory.

use chrono::Duration;
use dataset_store::{DatasetSource, RegenerationReason, COLUMNS};
use integration_tests::{fixtures, setup};
use integration_tests::setup::TestContext;
use log_generator::GeneratorConfig;
use pretty_assertions::assert_eq;
use search_core::schema::validate_events;
use search_core::{Category, SearchEvent};
use telemetry::metrics;

fn generated(rows: i64, days_back: i64, seed: u64) -> Vec<SearchEvent> {
    setup::generator()
        .generate(rows, days_back, seed)
        .expect("Generation failed")
}

#[test]
fn test_generated_events_satisfy_invariants() {
    let events = generated(5_000, 30, 42);

    assert_eq!(events.len(), 5_000);
    validate_events(&events).expect("Generated event violates an invariant");

    for e in &events {
        if let Some(position) = e.click_position {
            assert!((1..=9).contains(&position));
        }
        if e.purchased {
            assert!(e.price.unwrap() > 0.0);
        }
    }
}

#[test]
fn test_generated_timestamps_within_window() {
    let anchor = fixtures::anchor();
    let events = generated(2_000, 7, 1);

    assert!(events
        .iter()
        .all(|e| e.timestamp <= anchor && e.timestamp >= anchor - Duration::days(7)));
}

#[test]
fn test_same_seed_same_dataset() {
    assert_eq!(generated(500, 30, 42), generated(500, 30, 42));
    assert_ne!(generated(500, 30, 42), generated(500, 30, 43));
}

#[test]
fn test_zero_rows_is_empty() {
    assert!(generated(0, 30, 42).is_empty());
}

#[test]
fn test_zero_days_back_stamps_anchor() {
    let events = generated(20, 0, 42);
    assert!(events.iter().all(|e| e.timestamp == fixtures::anchor()));
}

#[test]
fn test_negative_arguments_rejected() {
    let generator = setup::generator();
    assert_eq!(generator.generate(-1, 30, 42).unwrap_err().code(), "ARG_001");
    assert_eq!(generator.generate(10, -5, 42).unwrap_err().code(), "ARG_001");
}

#[test]
fn test_all_categories_appear() {
    let events = generated(3_000, 30, 42);
    for category in Category::ALL {
        assert!(
            events.iter().any(|e| e.category == category),
            "{} missing from generated data",
            category
        );
    }
}

#[test]
fn test_missing_file_generated_then_loaded() {
    let ctx = TestContext::new(250);

    let first = ctx.store.load_or_generate().unwrap();
    assert_eq!(
        first.source(),
        DatasetSource::Generated {
            reason: RegenerationReason::Missing
        }
    );
    assert!(ctx.path().exists());

    let second = ctx.store.load_or_generate().unwrap();
    assert_eq!(second.source(), DatasetSource::Loaded);
    assert_eq!(first.events(), second.events());

    // Counters are process-wide and shared with concurrently running tests.
    let snapshot = metrics().snapshot();
    assert!(snapshot.datasets_generated >= 1);
    assert!(snapshot.datasets_loaded >= 1);
}

#[test]
fn test_persisted_header_matches_column_order() {
    let ctx = TestContext::new(10);
    ctx.store.load_or_generate().unwrap();

    let raw = ctx.read_raw();
    let header = raw.lines().next().unwrap();
    assert_eq!(header, COLUMNS.join(","));
    assert_eq!(raw.lines().count(), 11);
}

#[test]
fn test_generation_respects_configured_seed() {
    let a = TestContext::with_generation(GeneratorConfig {
        rows: 100,
        days_back: 30,
        seed: 9,
    });
    let b = TestContext::with_generation(GeneratorConfig {
        rows: 100,
        days_back: 30,
        seed: 9,
    });

    assert_eq!(
        a.store.load_or_generate().unwrap().events(),
        b.store.load_or_generate().unwrap().events()
    );
}

#[test]
fn test_empty_file_regenerated() {
    let ctx = TestContext::new(40);
    ctx.write_raw("");

    let dataset = ctx.store.load_or_generate().unwrap();

    assert_eq!(dataset.len(), 40);
    assert_eq!(
        dataset.source(),
        DatasetSource::Generated {
            reason: RegenerationReason::Empty
        }
    );
    assert!(!ctx.read_raw().is_empty());
}

#[test]
fn test_garbage_file_regenerated() {
    let ctx = TestContext::new(40);
    ctx.write_raw("\u{0}\u{1}garbage\n\"unterminated");

    let dataset = ctx.store.load_or_generate().unwrap();

    assert_eq!(
        dataset.source(),
        DatasetSource::Generated {
            reason: RegenerationReason::Unreadable
        }
    );
    assert_eq!(ctx.store.load().unwrap().len(), 40);
}

#[test]
fn test_invariant_violation_regenerated() {
    let ctx = TestContext::new(15);
    // Purchased without a click
    ctx.write_raw(&format!(
        "{}\n2026-10-01T08:00:00Z,s1,U1000,jeans,jeans,Apparel,0,,1,P10000,30.0,30.0,0,1,UK,mobile\n",
        COLUMNS.join(",")
    ));

    let dataset = ctx.store.load_or_generate().unwrap();
    assert_eq!(
        dataset.source(),
        DatasetSource::Generated {
            reason: RegenerationReason::Unreadable
        }
    );
    assert_eq!(dataset.len(), 15);
}

#[test]
fn test_non_finite_money_regenerated() {
    for value in ["NaN", "inf"] {
        let ctx = TestContext::new(15);
        ctx.write_raw(&format!(
            "{}\n2026-10-01T08:00:00Z,s1,U1000,jeans,jeans,Apparel,1,2,1,P10000,{v},{v},0,1,UK,mobile\n",
            COLUMNS.join(","),
            v = value
        ));

        assert!(ctx.store.load().unwrap_err().is_recoverable());

        let dataset = ctx.store.load_or_generate().unwrap();
        assert_eq!(
            dataset.source(),
            DatasetSource::Generated {
                reason: RegenerationReason::Unreadable
            }
        );
        assert_eq!(dataset.len(), 15);
        assert!(dataset.events().iter().all(|e| e.revenue.is_finite()));
    }
}

#[test]
fn test_legacy_file_is_enriched() {
    let ctx = TestContext::new(0);
    ctx.write_raw(
        "timestamp,session_id,user_id,query,category,clicked,click_position,purchased,product_id,no_result\n\
         2026-10-01 08:00:00,s1,U1000,Running-Shoes,Sportswear,1,2,1,P11111,0\n\
         2026-10-01 09:30:00,s2,U1001,jeens,Apparel,1,4,0,,0\n\
         2026-10-02 10:00:00,s3,U1002,blender,Home Appliances,0,,0,,1\n",
    );

    let events = ctx.store.load().unwrap();

    assert_eq!(events.len(), 3);
    assert_eq!(events[0].normalized_query, "running shoes");
    assert_eq!(events[1].normalized_query, "jeans");
    assert!(events[0].added_to_cart);

    // Sportswear list price is the midpoint of 40..180
    let price = events[0].price.unwrap();
    assert!((99.0..=121.0).contains(&price), "price {}", price);
    assert_eq!(events[0].revenue, price);
    assert_eq!(events[1].price, None);
    assert_eq!(events[1].revenue, 0.0);
    assert!(events[2].no_result);

    // Same file, same prices
    assert_eq!(ctx.store.load().unwrap(), events);
}

#[test]
fn test_save_overwrites_existing_dataset() {
    let ctx = TestContext::new(30);
    ctx.store.load_or_generate().unwrap();

    let replacement = fixtures::repeat(3, fixtures::purchase("perfume", Category::Beauty, 45.5));
    ctx.store.save(&replacement).unwrap();

    assert_eq!(ctx.store.load().unwrap(), replacement);
}
