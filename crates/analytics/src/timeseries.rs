//! Time-bucketed rollups for charting.
//!
//! Buckets are UTC and epoch-aligned. Every bucket in the range is emitted,
//! with zero counts where nothing happened, so the time axis is continuous.

use chrono::{DateTime, Utc};
use search_core::limits::MAX_TIME_BUCKETS;
use search_core::{Error, Result, SearchEvent};
use serde::{Deserialize, Serialize};

/// Bucket width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketWidth {
    Hour,
    #[default]
    Day,
}

impl BucketWidth {
    pub fn seconds(&self) -> i64 {
        match self {
            Self::Hour => 3_600,
            Self::Day => 86_400,
        }
    }

    /// Start of the bucket containing `t`.
    pub fn floor(&self, t: DateTime<Utc>) -> i64 {
        let width = self.seconds();
        t.timestamp().div_euclid(width) * width
    }
}

/// Counts for one bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub start: DateTime<Utc>,
    pub searches: u64,
    pub clicks: u64,
    pub purchases: u64,
    pub revenue: f64,
}

/// Buckets spanning the first through last event.
pub fn aggregate_by_time_bucket(events: &[SearchEvent], width: BucketWidth) -> Result<Vec<TimeBucket>> {
    let (Some(first), Some(last)) = (
        events.iter().map(|e| e.timestamp).min(),
        events.iter().map(|e| e.timestamp).max(),
    ) else {
        return Ok(Vec::new());
    };
    aggregate_by_time_bucket_in(events, width, first, last)
}

/// Buckets covering `[start, end]`.
///
/// Only events with `start <= timestamp <= end` are counted, even when an
/// excluded event falls inside the first or last bucket.
pub fn aggregate_by_time_bucket_in(
    events: &[SearchEvent],
    width: BucketWidth,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<TimeBucket>> {
    if end < start {
        return Err(Error::invalid_argument(format!(
            "bucket range end {} precedes start {}",
            end, start
        )));
    }

    let step = width.seconds();
    let first = width.floor(start);
    let last = width.floor(end);
    let count = ((last - first) / step + 1) as usize;
    if count > MAX_TIME_BUCKETS {
        return Err(Error::invalid_argument(format!(
            "{} buckets exceeds limit {}",
            count, MAX_TIME_BUCKETS
        )));
    }

    let mut buckets = (0..count)
        .map(|i| {
            let secs = first + i as i64 * step;
            DateTime::from_timestamp(secs, 0)
                .map(|start| TimeBucket {
                    start,
                    searches: 0,
                    clicks: 0,
                    purchases: 0,
                    revenue: 0.0,
                })
                .ok_or_else(|| Error::internal(format!("timestamp {} out of range", secs)))
        })
        .collect::<Result<Vec<_>>>()?;

    for event in events.iter().filter(|e| e.timestamp >= start && e.timestamp <= end) {
        let at = width.floor(event.timestamp);
        let bucket = &mut buckets[((at - first) / step) as usize];
        bucket.searches += 1;
        bucket.clicks += u64::from(event.clicked);
        bucket.purchases += u64::from(event.purchased);
        bucket.revenue += event.revenue;
    }

    Ok(buckets)
}
