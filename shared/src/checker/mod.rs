//! Freshness checking.
//!
//! Ties validation, query building and a [`SearchStore`](crate::storage::SearchStore)
//! together into a single check run.

pub mod freshness;

pub use freshness::{CheckError, FreshnessChecker};
