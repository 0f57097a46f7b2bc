//! Seismic catalog common types and errors.
//!
//! This crate provides foundational types shared across qk-core modules:
//! - Earthquake events and the catalog matrix
//! - Owned index permutations for reorder/restore bookkeeping
//! - Completeness tables
//! - Common error types

pub mod catalog;
pub mod completeness;
pub mod error;
pub mod permutation;

pub use catalog::{Catalog, Event, LocationError};
pub use completeness::{CompletenessRow, CompletenessTable};
pub use error::{Error, Result};
pub use permutation::Permutation;
