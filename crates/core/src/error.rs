//! Unified error types for the search analytics workspace.
//!
//! Error codes:
//! - ARG_001: Invalid argument (negative or out-of-range counts, bad config)
//! - DATA_001-003: Dataset errors (unreadable, invariant violation, persist)
//! - IO_001: Filesystem errors
//! - SER_001: Serialization errors
//! - INT_001: Internal errors

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Dataset error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetErrorCode {
    /// DATA_001: Persisted dataset could not be parsed
    Unreadable,
    /// DATA_002: Event violates a data model invariant
    InvariantViolated,
    /// DATA_003: Dataset could not be written
    PersistFailed,
}

impl DatasetErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unreadable => "DATA_001",
            Self::InvariantViolated => "DATA_002",
            Self::PersistFailed => "DATA_003",
        }
    }
}

/// Unified error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("[ARG_001] invalid argument: {0}")]
    InvalidArgument(String),

    /// Parse failure of a persisted dataset. Recovered by regenerating.
    #[error("[DATA_001] dataset unreadable: {0}")]
    DatasetUnreadable(String),

    #[error("[DATA_002] invariant violated: {0}")]
    Validation(String),

    #[error("[DATA_003] failed to persist dataset: {0}")]
    Persist(String),

    #[error("[IO_001] io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("[SER_001] serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("[INT_001] internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn unreadable(msg: impl Into<String>) -> Self {
        Self::DatasetUnreadable(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn persist(msg: impl Into<String>) -> Self {
        Self::Persist(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the stable error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "ARG_001",
            Self::DatasetUnreadable(_) => DatasetErrorCode::Unreadable.code(),
            Self::Validation(_) => DatasetErrorCode::InvariantViolated.code(),
            Self::Persist(_) => DatasetErrorCode::PersistFailed.code(),
            Self::Io(_) => "IO_001",
            Self::Serialization(_) => "SER_001",
            Self::Internal(_) => "INT_001",
        }
    }

    /// Whether the caller has a defined local fallback for this error.
    ///
    /// An unreadable dataset is replaced by a freshly generated one.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::DatasetUnreadable(_))
    }
}
