//! Flat CSV row layout for persisted datasets.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use log_generator::canonical_query;
use search_core::schema::validate_event;
use search_core::{Category, Error, Result, SearchEvent};
use serde::{Deserialize, Serialize};

/// Column order of a persisted dataset.
pub const COLUMNS: [&str; 16] = [
    "timestamp",
    "session_id",
    "user_id",
    "query",
    "normalized_query",
    "category",
    "clicked",
    "click_position",
    "purchased",
    "product_id",
    "price",
    "revenue",
    "no_result",
    "added_to_cart",
    "country",
    "device",
];

/// Columns a file must carry to be readable at all.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "timestamp",
    "session_id",
    "user_id",
    "query",
    "category",
    "clicked",
    "purchased",
];

/// One CSV row. Field order matches [`COLUMNS`].
///
/// Optional columns may be missing entirely from older or foreign files;
/// `revenue == None` marks a row that still needs price enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub timestamp: String,
    pub session_id: String,
    pub user_id: String,
    pub query: String,
    #[serde(default)]
    pub normalized_query: Option<String>,
    pub category: String,
    #[serde(with = "flag")]
    pub clicked: bool,
    #[serde(default)]
    pub click_position: Option<u8>,
    #[serde(with = "flag")]
    pub purchased: bool,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub revenue: Option<f64>,
    #[serde(default, with = "flag")]
    pub no_result: bool,
    #[serde(default, with = "flag")]
    pub added_to_cart: bool,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub device: Option<String>,
}

impl From<&SearchEvent> for EventRecord {
    fn from(event: &SearchEvent) -> Self {
        Self {
            timestamp: event.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            session_id: event.session_id.clone(),
            user_id: event.user_id.clone(),
            query: event.query.clone(),
            normalized_query: Some(event.normalized_query.clone()),
            category: event.category.as_str().to_string(),
            clicked: event.clicked,
            click_position: event.click_position,
            purchased: event.purchased,
            product_id: event.product_id.clone(),
            price: event.price,
            revenue: Some(event.revenue),
            no_result: event.no_result,
            added_to_cart: event.added_to_cart,
            country: event.country.clone(),
            device: event.device.clone(),
        }
    }
}

impl EventRecord {
    /// Whether price/revenue still have to be derived.
    pub fn needs_pricing(&self) -> bool {
        self.revenue.is_none()
    }

    /// Converts the row into a validated event.
    ///
    /// Any decoding problem or invariant violation is reported as
    /// `DatasetUnreadable`.
    pub fn into_event(self) -> Result<SearchEvent> {
        let timestamp = parse_timestamp(&self.timestamp)?;
        let category: Category = self
            .category
            .parse()
            .map_err(|e: Error| Error::unreadable(e.to_string()))?;
        let revenue = self
            .revenue
            .ok_or_else(|| Error::unreadable("row has no revenue after enrichment"))?;
        let normalized_query = match self.normalized_query {
            Some(q) if !q.trim().is_empty() => q,
            _ => canonical_query(&self.query),
        };

        let event = SearchEvent {
            timestamp,
            session_id: self.session_id,
            user_id: self.user_id,
            query: self.query,
            normalized_query,
            category,
            clicked: self.clicked,
            click_position: self.click_position,
            // Older files predate the cart column; a purchase implies a cart add.
            added_to_cart: self.added_to_cart || self.purchased,
            purchased: self.purchased,
            product_id: self.product_id,
            price: self.price,
            revenue,
            no_result: self.no_result,
            country: self.country,
            device: self.device,
        };

        validate_event(&event).map_err(|e| Error::unreadable(e.to_string()))?;
        Ok(event)
    }
}

/// Parses RFC 3339, or a naive `YYYY-MM-DD HH:MM:SS[.fff]` taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Ok(t.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| Error::unreadable(format!("bad timestamp {:?}", raw)))
}

/// Booleans are written as 0/1; reading also accepts true/false.
mod flag {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "1.0" | "true" => Ok(true),
            "0" | "0.0" | "false" | "" => Ok(false),
            other => Err(de::Error::custom(format!("invalid flag {:?}", other))),
        }
    }
}
