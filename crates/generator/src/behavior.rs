//! Behavior model for synthetic search sessions.
//!
//! Per-category click, purchase, and price parameters live in one immutable
//! structure handed to the generator at construction. Defaults reproduce the
//! demo storefront; any of it can be overridden from configuration.

use std::collections::{BTreeMap, BTreeSet};

use search_core::{Category, Error, Result};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Behavioral parameters for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CategoryProfile {
    pub category: Category,
    /// Base probability a search in this category gets a click
    #[validate(range(min = 0.0, max = 1.0))]
    pub click_prob: f64,
    /// Added to the base purchase probability after a click
    #[validate(range(min = 0.0, max = 1.0))]
    pub purchase_bonus: f64,
    #[validate(range(min = 0.01))]
    pub min_price: f64,
    #[validate(range(min = 0.01))]
    pub max_price: f64,
}

impl CategoryProfile {
    fn new(category: Category, click_prob: f64, purchase_bonus: f64, price: (f64, f64)) -> Self {
        Self {
            category,
            click_prob,
            purchase_bonus,
            min_price: price.0,
            max_price: price.1,
        }
    }

    /// Midpoint of the price range, used as a list price for enrichment.
    pub fn base_price(&self) -> f64 {
        (self.min_price + self.max_price) / 2.0
    }
}

/// Full behavior model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BehaviorModel {
    /// One profile per category
    #[serde(default = "default_categories")]
    #[validate(nested)]
    pub categories: Vec<CategoryProfile>,
    /// Purchase probability after a click, before the category bonus
    #[serde(default = "default_base_purchase_prob")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub base_purchase_prob: f64,
    /// Subtracted from the click probability of poor queries
    #[serde(default = "default_poor_query_penalty")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub poor_query_penalty: f64,
    /// Normalized queries with systematically weak search configuration
    #[serde(default = "default_poor_queries")]
    pub poor_queries: Vec<String>,
    /// Chance a query is typed as one of its misspelled variants
    #[serde(default = "default_variant_prob")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub variant_prob: f64,
    /// Chance a search returns no results at all
    #[serde(default = "default_no_result_prob")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub no_result_prob: f64,
    /// Chance a clicked, unpurchased result still lands in the cart
    #[serde(default = "default_cart_prob")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub cart_prob: f64,
}

fn default_categories() -> Vec<CategoryProfile> {
    use Category::*;
    vec![
        CategoryProfile::new(Sportswear, 0.70, 0.0, (40.0, 180.0)),
        CategoryProfile::new(Footwear, 0.70, 0.0, (50.0, 200.0)),
        CategoryProfile::new(Apparel, 0.65, 0.0, (20.0, 150.0)),
        CategoryProfile::new(Beauty, 0.75, 0.08, (8.0, 80.0)),
        CategoryProfile::new(Electronics, 0.80, 0.0, (25.0, 250.0)),
        CategoryProfile::new(HomeAppliances, 0.60, 0.0, (35.0, 300.0)),
        CategoryProfile::new(PetSupplies, 0.60, 0.08, (10.0, 120.0)),
    ]
}

fn default_base_purchase_prob() -> f64 {
    0.22
}

fn default_poor_query_penalty() -> f64 {
    0.2
}

fn default_poor_queries() -> Vec<String> {
    vec!["t shirt".into(), "blender".into(), "cat litter".into()]
}

fn default_variant_prob() -> f64 {
    0.1
}

fn default_no_result_prob() -> f64 {
    0.05
}

fn default_cart_prob() -> f64 {
    0.15
}

impl Default for BehaviorModel {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            base_purchase_prob: default_base_purchase_prob(),
            poor_query_penalty: default_poor_query_penalty(),
            poor_queries: default_poor_queries(),
            variant_prob: default_variant_prob(),
            no_result_prob: default_no_result_prob(),
            cart_prob: default_cart_prob(),
        }
    }
}

impl BehaviorModel {
    /// Validates the model and indexes it for lookup.
    pub fn compile(&self) -> Result<CompiledModel> {
        self.validate()
            .map_err(|e| Error::invalid_argument(format!("behavior model: {}", e)))?;

        let mut profiles = BTreeMap::new();
        for profile in &self.categories {
            if profile.min_price > profile.max_price {
                return Err(Error::invalid_argument(format!(
                    "{}: min_price {} exceeds max_price {}",
                    profile.category, profile.min_price, profile.max_price
                )));
            }
            if profiles.insert(profile.category, profile.clone()).is_some() {
                return Err(Error::invalid_argument(format!(
                    "duplicate profile for {}",
                    profile.category
                )));
            }
        }

        if let Some(missing) = Category::ALL.iter().find(|c| !profiles.contains_key(c)) {
            return Err(Error::invalid_argument(format!(
                "no profile for category {}",
                missing
            )));
        }

        Ok(CompiledModel {
            profiles,
            poor_queries: self.poor_queries.iter().cloned().collect(),
            model: self.clone(),
        })
    }
}

/// A validated behavior model with per-category lookup.
#[derive(Debug, Clone)]
pub struct CompiledModel {
    profiles: BTreeMap<Category, CategoryProfile>,
    poor_queries: BTreeSet<String>,
    model: BehaviorModel,
}

impl CompiledModel {
    pub fn profile(&self, category: Category) -> &CategoryProfile {
        // compile() guarantees every category is present
        &self.profiles[&category]
    }

    pub fn is_poor_query(&self, normalized_query: &str) -> bool {
        self.poor_queries.contains(normalized_query)
    }

    pub fn model(&self) -> &BehaviorModel {
        &self.model
    }

    /// Click probability before clamping.
    pub fn raw_click_prob(&self, category: Category, normalized_query: &str) -> f64 {
        let base = self.profile(category).click_prob;
        if self.is_poor_query(normalized_query) {
            base - self.model.poor_query_penalty
        } else {
            base
        }
    }

    /// Post-click purchase probability, capped at 1.
    pub fn purchase_prob(&self, category: Category) -> f64 {
        (self.model.base_purchase_prob + self.profile(category).purchase_bonus).min(1.0)
    }
}
