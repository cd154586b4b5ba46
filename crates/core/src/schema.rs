//! Invariant validation for search events.

use validator::Validate;

use crate::error::{Error, Result};
use crate::events::SearchEvent;
use crate::limits::{MAX_CLICK_POSITION, MIN_CLICK_POSITION, MONEY_EPSILON};

/// Validates a single event against the data model invariants.
pub fn validate_event(event: &SearchEvent) -> Result<()> {
    // Run validator derive validations
    event
        .validate()
        .map_err(|e| Error::validation(format!("{}", e)))?;

    // Range rules accept NaN
    if !event.revenue.is_finite() {
        return Err(Error::validation(format!("revenue {} is not finite", event.revenue)));
    }
    if let Some(price) = event.price.filter(|p| !p.is_finite()) {
        return Err(Error::validation(format!("price {} is not finite", price)));
    }

    // Cross-field: click position present iff clicked
    match (event.clicked, event.click_position) {
        (true, None) => return Err(Error::validation("clicked event has no click_position")),
        (false, Some(_)) => {
            return Err(Error::validation("click_position set on non-clicked event"))
        }
        (true, Some(pos)) if !(MIN_CLICK_POSITION..=MAX_CLICK_POSITION).contains(&pos) => {
            return Err(Error::validation(format!(
                "click_position {} outside [{}, {}]",
                pos, MIN_CLICK_POSITION, MAX_CLICK_POSITION
            )))
        }
        _ => {}
    }

    // Cross-field: funnel ordering
    if event.purchased && !event.clicked {
        return Err(Error::validation("purchased without a click"));
    }
    if event.added_to_cart && !event.clicked {
        return Err(Error::validation("added to cart without a click"));
    }
    if event.purchased && !event.added_to_cart {
        return Err(Error::validation("purchased without adding to cart"));
    }

    // Cross-field: price and revenue
    match (event.purchased, event.price) {
        (true, None) => return Err(Error::validation("purchased event has no price")),
        (false, Some(_)) => return Err(Error::validation("price set on non-purchased event")),
        (true, Some(price)) if (event.revenue - price).abs() > MONEY_EPSILON => {
            return Err(Error::validation(format!(
                "revenue {} does not match price {}",
                event.revenue, price
            )))
        }
        (false, None) if event.revenue.abs() > MONEY_EPSILON => {
            return Err(Error::validation("revenue on non-purchased event"))
        }
        _ => {}
    }
    if event.purchased != event.product_id.is_some() {
        return Err(Error::validation("product_id must be present iff purchased"));
    }

    // Cross-field: no-result overrides
    if event.no_result && (event.clicked || event.purchased || event.added_to_cart) {
        return Err(Error::validation("no_result event has downstream engagement"));
    }

    Ok(())
}

/// Validates every event, reporting the first violation with its row index.
pub fn validate_events(events: &[SearchEvent]) -> Result<()> {
    for (i, event) in events.iter().enumerate() {
        validate_event(event).map_err(|e| Error::validation(format!("event[{}]: {}", i, e)))?;
    }
    Ok(())
}
