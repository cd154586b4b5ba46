//! Query text normalization.

use std::sync::LazyLock;

use regex::Regex;

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\-_]+").expect("separator pattern is valid"));

/// Canonicalizes free-form query text.
///
/// Lowercases, treats hyphens and underscores as spaces, and collapses runs
/// of whitespace. Spelling correction is the catalog's job, not this one.
pub fn normalize_query(raw: &str) -> String {
    SEPARATORS
        .replace_all(raw.trim(), " ")
        .trim()
        .to_lowercase()
}

/// Case-insensitive substring test used by query text filters.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
