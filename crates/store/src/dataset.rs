//! Caller-owned dataset handle.

use std::fmt;

use search_core::SearchEvent;
use serde::{Deserialize, Serialize};

/// Why a dataset had to be generated instead of loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegenerationReason {
    /// No file at the configured path
    Missing,
    /// Zero-length file, or a header with no rows
    Empty,
    /// File exists but failed to parse or validate
    Unreadable,
}

impl fmt::Display for RegenerationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Missing => "missing",
            Self::Empty => "empty",
            Self::Unreadable => "unreadable",
        };
        f.write_str(s)
    }
}

/// Where the events of a dataset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DatasetSource {
    Loaded,
    Generated { reason: RegenerationReason },
}

/// An immutable, loaded-once set of search events.
///
/// Held by the caller for the session and passed explicitly to filter and
/// aggregate calls.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    events: Vec<SearchEvent>,
    source: DatasetSource,
}

impl Dataset {
    pub fn loaded(events: Vec<SearchEvent>) -> Self {
        Self {
            events,
            source: DatasetSource::Loaded,
        }
    }

    pub fn generated(events: Vec<SearchEvent>, reason: RegenerationReason) -> Self {
        Self {
            events,
            source: DatasetSource::Generated { reason },
        }
    }

    pub fn events(&self) -> &[SearchEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn source(&self) -> DatasetSource {
        self.source
    }

    pub fn into_events(self) -> Vec<SearchEvent> {
        self.events
    }
}
