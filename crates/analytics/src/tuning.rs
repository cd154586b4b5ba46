//! Naive search-tuning suggestions for opportunity queries.

use std::collections::{BTreeMap, BTreeSet};

use search_core::SearchEvent;
use serde::{Deserialize, Serialize};

use crate::opportunity::detect_opportunities;
use crate::rollup::{aggregate, aggregate_by_query, QuerySortKey};

/// What to change about a query's search experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    /// Results are shown but rarely clicked
    ImproveRanking,
    /// The query hits empty result pages more than average
    ReduceZeroResults,
    /// Clicks convert to purchases less than average
    ImproveConversion,
    /// Shoppers type misspellings that should map to this query
    AddSpellingSynonyms,
}

/// One suggestion with its supporting numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningSuggestion {
    pub normalized_query: String,
    pub kind: SuggestionKind,
    pub searches: u64,
    pub rationale: String,
}

/// Raw spellings seen for each normalized query, canonical spelling excluded.
pub fn query_variants(events: &[SearchEvent]) -> BTreeMap<String, BTreeSet<String>> {
    let mut variants: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for event in events.iter().filter(|e| e.is_variant_spelling()) {
        variants
            .entry(event.normalized_query.clone())
            .or_default()
            .insert(event.query.clone());
    }
    variants
}

/// Suggestions for every opportunity query, busiest first.
pub fn suggest_tuning(events: &[SearchEvent]) -> Vec<TuningSuggestion> {
    let global = aggregate(events);
    let by_query = aggregate_by_query(events, QuerySortKey::Searches);
    let variants = query_variants(events);

    let mut suggestions = Vec::new();
    for q in detect_opportunities(&by_query) {
        let m = &q.metrics;
        let mut push = |kind, rationale: String| {
            suggestions.push(TuningSuggestion {
                normalized_query: q.normalized_query.clone(),
                kind,
                searches: m.total_searches,
                rationale,
            })
        };

        push(
            SuggestionKind::ImproveRanking,
            format!(
                "{} searches but CTR {:.1}% (overall {:.1}%)",
                m.total_searches,
                m.click_through_rate * 100.0,
                global.click_through_rate * 100.0
            ),
        );

        if m.no_result_rate > global.no_result_rate {
            push(
                SuggestionKind::ReduceZeroResults,
                format!(
                    "no-result rate {:.1}% vs overall {:.1}%",
                    m.no_result_rate * 100.0,
                    global.no_result_rate * 100.0
                ),
            );
        }

        if m.post_click_conversion_rate < global.post_click_conversion_rate {
            push(
                SuggestionKind::ImproveConversion,
                format!(
                    "post-click conversion {:.1}% vs overall {:.1}%",
                    m.post_click_conversion_rate * 100.0,
                    global.post_click_conversion_rate * 100.0
                ),
            );
        }

        if let Some(spellings) = variants.get(&q.normalized_query) {
            let list: Vec<&str> = spellings.iter().map(String::as_str).collect();
            push(
                SuggestionKind::AddSpellingSynonyms,
                format!("map {} to {:?}", list.join(", "), q.normalized_query),
            );
        }
    }

    suggestions
}
