//! Core types, invariants, and validation for synthetic search logs.

pub mod error;
pub mod events;
pub mod limits;
pub mod normalize;
pub mod schema;

pub use error::{Error, Result};
pub use events::*;
pub use normalize::*;
