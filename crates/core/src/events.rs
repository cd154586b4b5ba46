//! Search event type definitions.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::Error;

/// Product category a query belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Sportswear,
    Footwear,
    Apparel,
    Beauty,
    Electronics,
    #[serde(rename = "Home Appliances")]
    HomeAppliances,
    #[serde(rename = "Pet Supplies")]
    PetSupplies,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 7] = [
        Self::Sportswear,
        Self::Footwear,
        Self::Apparel,
        Self::Beauty,
        Self::Electronics,
        Self::HomeAppliances,
        Self::PetSupplies,
    ];

    /// Returns the display name used in persisted datasets.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sportswear => "Sportswear",
            Self::Footwear => "Footwear",
            Self::Apparel => "Apparel",
            Self::Beauty => "Beauty",
            Self::Electronics => "Electronics",
            Self::HomeAppliances => "Home Appliances",
            Self::PetSupplies => "Pet Supplies",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::validation(format!("unknown category: {:?}", s)))
    }
}

/// One logged search interaction.
///
/// Events are immutable once produced: filtering and simulation build new
/// collections instead of editing existing events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SearchEvent {
    /// When the search happened (minute granularity when generated)
    pub timestamp: DateTime<Utc>,
    /// Opaque session identifier
    #[validate(length(min = 1, max = 128))]
    pub session_id: String,
    /// Opaque user identifier
    #[validate(length(min = 1, max = 128))]
    pub user_id: String,
    /// Raw query text as typed, possibly misspelled
    #[validate(length(min = 1, max = 256))]
    pub query: String,
    /// Canonical form of `query`
    #[validate(length(min = 1, max = 256))]
    pub normalized_query: String,
    pub category: Category,
    pub clicked: bool,
    /// Rank of the clicked result, present only when clicked
    #[validate(range(min = 1, max = 9))]
    pub click_position: Option<u8>,
    /// Clicked result was added to the cart
    pub added_to_cart: bool,
    pub purchased: bool,
    /// Purchased product, present only when purchased
    pub product_id: Option<String>,
    /// Unit price, present only when purchased
    #[validate(range(min = 0.01))]
    pub price: Option<f64>,
    /// Equals `price` when purchased, otherwise 0
    #[validate(range(min = 0.0))]
    pub revenue: f64,
    /// The search returned nothing to click
    pub no_result: bool,
    pub country: Option<String>,
    pub device: Option<String>,
}

impl SearchEvent {
    /// Returns the calendar date (UTC) of the event.
    pub fn date(&self) -> chrono::NaiveDate {
        self.timestamp.date_naive()
    }

    /// Whether the raw query differs from its canonical spelling.
    pub fn is_variant_spelling(&self) -> bool {
        self.query != self.normalized_query
    }
}
