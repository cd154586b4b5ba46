//! Static query catalog: canonical queries, their categories, and the
//! misspellings shoppers actually type.

use search_core::{normalize_query, Category};

/// A canonical query with its category and noisy spellings.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub query: &'static str,
    pub category: Category,
    pub variants: &'static [&'static str],
}

const fn entry(
    query: &'static str,
    category: Category,
    variants: &'static [&'static str],
) -> CatalogEntry {
    CatalogEntry {
        query,
        category,
        variants,
    }
}

/// Queries drawn by the generator.
pub const CATALOG: &[CatalogEntry] = &[
    entry("running shoes", Category::Sportswear, &["runing shoes", "running shoe"]),
    entry("sneakers", Category::Footwear, &["sneeker", "snekers"]),
    entry("winter jacket", Category::Apparel, &["winter jaket"]),
    entry("jeans", Category::Apparel, &["jeens"]),
    entry("t shirt", Category::Apparel, &["t-shirt", "tshirt"]),
    entry("lipstick", Category::Beauty, &["lipstik"]),
    entry("moisturizer", Category::Beauty, &["moisturiser"]),
    entry("perfume", Category::Beauty, &["perfum"]),
    entry("gaming mouse", Category::Electronics, &["gameing mouse"]),
    entry("wireless keyboard", Category::Electronics, &["wireless keybord"]),
    entry("earbuds", Category::Electronics, &["ear buds"]),
    entry("smart watch", Category::Electronics, &["smartwatch"]),
    entry("coffee maker", Category::HomeAppliances, &["cofee maker"]),
    entry("blender", Category::HomeAppliances, &[]),
    entry("vacuum cleaner", Category::HomeAppliances, &["vaccum cleaner"]),
    entry("dog food", Category::PetSupplies, &[]),
    entry("cat litter", Category::PetSupplies, &["cat liter"]),
    entry("yoga mat", Category::Sportswear, &["yoga matt"]),
];

pub const COUNTRIES: &[&str] = &["Canada", "USA", "UK", "Germany", "India", "Brazil", "Kenya"];

pub const DEVICES: &[&str] = &["mobile", "desktop", "tablet"];

/// Looks up a canonical query.
pub fn lookup(query: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|e| e.query == query)
}

/// Maps raw query text to its canonical form.
///
/// Known misspellings resolve to their catalog query; anything else falls
/// back to plain text normalization.
pub fn canonical_query(raw: &str) -> String {
    let normalized = normalize_query(raw);
    CATALOG
        .iter()
        .find(|e| {
            e.query == normalized || e.variants.iter().any(|v| normalize_query(v) == normalized)
        })
        .map(|e| e.query.to_string())
        .unwrap_or(normalized)
}
