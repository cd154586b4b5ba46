//! Filtering, aggregation and reporting over generated and hand-built data.

use chrono::NaiveDate;
use integration_tests::fixtures::{click, no_result, on_day, purchase, repeat, search};
use integration_tests::setup;
use pretty_assertions::assert_eq;
use search_core::{Category, SearchEvent};
use search_metrics::{
    aggregate, aggregate_by_query, detect_opportunities, filter, simulate_ab, suggest_tuning,
    DashboardReport, ExperimentConfig, ExperimentTarget, FilterCriteria, QuerySortKey, ReportConfig, Rollup,
    SuggestionKind,
};

fn generated(rows: i64) -> Vec<SearchEvent> {
    setup::generator()
        .generate(rows, 30, 42)
        .expect("Generation failed")
}

/// `searches` events for `query`, of which `clicks` were clicked.
fn query_with_ctr(query: &str, searches: usize, clicks: usize) -> Vec<SearchEvent> {
    let mut events = repeat(clicks, click(query, Category::Electronics, 2));
    events.extend(repeat(searches - clicks, search(query, Category::Electronics)));
    events
}

#[test]
fn test_unrestricted_filter_returns_everything() {
    let events = generated(1_000);
    assert_eq!(filter(&events, &FilterCriteria::default()), events);
}

#[test]
fn test_filter_is_idempotent() {
    let events = generated(2_000);
    let criteria = FilterCriteria::default()
        .with_categories([Category::Electronics, Category::Beauty])
        .with_devices(["mobile"])
        .with_query("e");

    let once = filter(&events, &criteria);
    let twice = filter(&once, &criteria);

    assert!(!once.is_empty());
    assert_eq!(once, twice);
    assert!(once
        .iter()
        .all(|e| matches!(e.category, Category::Electronics | Category::Beauty)));
}

#[test]
fn test_filter_preserves_order() {
    let events = generated(1_000);
    let criteria = FilterCriteria::default().with_countries(["Kenya"]);

    let filtered = filter(&events, &criteria);
    let expected: Vec<_> = events
        .iter()
        .filter(|e| e.country.as_deref() == Some("Kenya"))
        .cloned()
        .collect();
    assert_eq!(filtered, expected);
}

#[test]
fn test_date_range_is_inclusive() {
    let events = vec![
        on_day(search("jeans", Category::Apparel), 2026, 10, 1),
        on_day(search("jeans", Category::Apparel), 2026, 10, 2),
        on_day(search("jeans", Category::Apparel), 2026, 10, 3),
        on_day(search("jeans", Category::Apparel), 2026, 10, 4),
    ];
    let criteria = FilterCriteria::default().between(
        NaiveDate::from_ymd_opt(2026, 10, 2).unwrap(),
        NaiveDate::from_ymd_opt(2026, 10, 3).unwrap(),
    );

    assert_eq!(filter(&events, &criteria).len(), 2);
}

#[test]
fn test_query_filter_is_case_insensitive() {
    let mut shouted = search("GAMING MOUSE", Category::Electronics);
    shouted.normalized_query = "gaming mouse".into();
    let events = vec![shouted, search("earbuds", Category::Electronics)];

    let filtered = filter(&events, &FilterCriteria::default().with_query("mouse"));
    assert_eq!(filtered.len(), 1);
}

#[test]
fn test_empty_filter_result_aggregates_to_zero() {
    let events = generated(500);
    let criteria = FilterCriteria::default().with_countries(["Atlantis"]);

    let filtered = filter(&events, &criteria);

    assert!(filtered.is_empty());
    assert_eq!(aggregate(&filtered), Rollup::default());
    assert!(aggregate_by_query(&filtered, QuerySortKey::Searches).is_empty());
    assert!(detect_opportunities(&[]).is_empty());
}

#[test]
fn test_two_event_rollup() {
    let events = vec![
        purchase("earbuds", Category::Electronics, 90.0),
        search("earbuds", Category::Electronics),
    ];

    let rollup = aggregate(&events);

    assert_eq!(rollup.total_searches, 2);
    assert_eq!(rollup.click_through_rate, 0.5);
    assert_eq!(rollup.purchase_rate, 0.5);
    assert_eq!(rollup.post_click_conversion_rate, 1.0);
    assert_eq!(rollup.total_revenue, 90.0);
    assert_eq!(rollup.revenue_per_search, 45.0);
}

#[test]
fn test_no_clicks_gives_zero_conversion() {
    let events = repeat(100, search("blender", Category::HomeAppliances));
    let rollup = aggregate(&events);

    assert_eq!(rollup.clicks, 0);
    assert_eq!(rollup.click_through_rate, 0.0);
    assert_eq!(rollup.post_click_conversion_rate, 0.0);
}

#[test]
fn test_per_query_totals_match_global() {
    let events = generated(3_000);
    let global = aggregate(&events);
    let by_query = aggregate_by_query(&events, QuerySortKey::Revenue);

    let searches: u64 = by_query.iter().map(|q| q.searches()).sum();
    let purchases: u64 = by_query.iter().map(|q| q.metrics.purchases).sum();
    let revenue: f64 = by_query.iter().map(|q| q.metrics.total_revenue).sum();

    assert_eq!(searches, global.total_searches);
    assert_eq!(purchases, global.purchases);
    assert!((revenue - global.total_revenue).abs() < 1e-6);
    assert!(by_query
        .windows(2)
        .all(|w| w[0].metrics.total_revenue >= w[1].metrics.total_revenue));
}

#[test]
fn test_rates_are_fractions() {
    let rollup = aggregate(&generated(2_000));
    for rate in [
        rollup.click_through_rate,
        rollup.add_to_cart_rate,
        rollup.purchase_rate,
        rollup.post_click_conversion_rate,
        rollup.no_result_rate,
    ] {
        assert!((0.0..=1.0).contains(&rate));
    }
    assert!(rollup.purchases <= rollup.add_to_carts);
    assert!(rollup.add_to_carts <= rollup.clicks);
}

#[test]
fn test_poor_queries_click_less() {
    let events = generated(20_000);
    let poor = ["t shirt", "blender", "cat litter"];

    let (weak, rest): (Vec<_>, Vec<_>) = events
        .into_iter()
        .partition(|e| poor.contains(&e.normalized_query.as_str()));

    assert!(aggregate(&weak).click_through_rate + 0.1 < aggregate(&rest).click_through_rate);
}

#[test]
fn test_opportunity_scenario() {
    let mut events = query_with_ctr("busy poor", 100, 10);
    events.extend(query_with_ctr("busy good", 100, 90));
    events.extend(query_with_ctr("quiet poor", 10, 1));
    events.extend(query_with_ctr("quiet good", 10, 9));

    let by_query = aggregate_by_query(&events, QuerySortKey::Searches);
    let opportunities = detect_opportunities(&by_query);

    assert_eq!(opportunities.len(), 1);
    assert_eq!(opportunities[0].normalized_query, "busy poor");
}

#[test]
fn test_tuning_flags_zero_results_and_variants() {
    let mut events = query_with_ctr("busy good", 34, 30);
    events.extend(repeat(6, purchase("busy good", Category::Electronics, 20.0)));
    events.extend(query_with_ctr("quiet", 4, 2));
    events.extend(query_with_ctr("smart watch", 30, 3));
    events.extend(repeat(10, no_result("smart watch", Category::Electronics)));
    let mut variant = search("smartwatch", Category::Electronics);
    variant.normalized_query = "smart watch".into();
    events.push(variant);

    let suggestions = suggest_tuning(&events);
    let kinds: Vec<_> = suggestions.iter().map(|s| s.kind).collect();

    assert!(suggestions.iter().all(|s| s.normalized_query == "smart watch"));
    assert!(kinds.contains(&SuggestionKind::ImproveRanking));
    assert!(kinds.contains(&SuggestionKind::ReduceZeroResults));
    assert!(kinds.contains(&SuggestionKind::AddSpellingSynonyms));
    assert!(kinds.contains(&SuggestionKind::ImproveConversion));

    let conversion = suggestions
        .iter()
        .find(|s| s.kind == SuggestionKind::ImproveConversion)
        .unwrap();
    assert!(conversion.rationale.starts_with("post-click conversion 0.0%"));
}

#[test]
fn test_ab_simulation_is_reproducible() {
    let events = generated(4_000);
    let config = ExperimentConfig {
        target: ExperimentTarget::AllQueries,
        ..ExperimentConfig::default()
    };

    let a = simulate_ab(&events, &config).unwrap();
    let b = simulate_ab(&events, &config).unwrap();

    assert_eq!(a, b);
    assert_eq!(
        a.control.total_searches + a.treatment.total_searches,
        events.len() as u64
    );
    assert_eq!(a.target_queries.len(), 18);
}

#[test]
fn test_ab_arms_fixed_by_seed_and_share() {
    let events = generated(4_000);
    let run = |uplift: f64| {
        let config = ExperimentConfig {
            ctr_uplift: uplift,
            target: ExperimentTarget::AllQueries,
            ..ExperimentConfig::default()
        };
        simulate_ab(&events, &config).unwrap()
    };

    let flat = run(0.0);
    let lifted = run(0.9);

    assert_eq!(flat.treatment.total_searches, lifted.treatment.total_searches);
    assert_eq!(flat.control, lifted.control);
    assert!(lifted.treatment.clicks > flat.treatment.clicks);
}

#[test]
fn test_report_over_generated_dataset() {
    let ctx = setup::TestContext::new(1_500);
    let dataset = ctx.store.load_or_generate().unwrap();

    let report = DashboardReport::build(dataset.events(), &ReportConfig::default()).unwrap();

    assert_eq!(report.rows, 1_500);
    assert_eq!(report.top_queries.len(), 10);
    assert_eq!(
        report.series.iter().map(|b| b.searches).sum::<u64>(),
        1_500
    );
    assert!(report.experiment.is_some());

    let json = serde_json::to_value(&report).unwrap();
    for key in ["rows", "summary", "top_queries", "series", "opportunities", "suggestions"] {
        assert!(json.get(key).is_some(), "report JSON missing {}", key);
    }
    assert!(json["top_queries"][0]["normalized_query"].is_string());
}

#[test]
fn test_report_on_empty_selection() {
    let events = generated(200);
    let criteria = FilterCriteria::default().with_query("no such product");

    let report = DashboardReport::build(&filter(&events, &criteria), &ReportConfig::default())
        .unwrap();

    assert!(report.is_empty());
    assert!(report.top_queries.is_empty());
    assert!(report.series.is_empty());
}
