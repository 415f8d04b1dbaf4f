//! Crate-level tests for the full pipeline.
//!
//! - `determinism.rs`: identical output for identical or reordered input
//! - `integration.rs`: end-to-end tournament scenarios
//! - `properties.rs`: property tests of ranking and aggregation invariants
//! - `helpers.rs`: scenario builders

mod helpers;

pub use helpers::*;
