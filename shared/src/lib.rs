//! Freshcheck Shared Library
//!
//! This crate contains the pieces of the freshness probe: threshold
//! validation, count-only query construction, search store access and the
//! checker that turns hit counts into an OK / WARNING / CRITICAL outcome.
//!
//! # Modules
//!
//! - [`models`] - Check input, window lengths and outcomes
//! - [`query`] - Count-only time range queries
//! - [`storage`] - Search store trait and implementations
//! - [`config`] - Store connection settings
//! - [`checker`] - The freshness checker
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, Utc};
//! use shared::checker::FreshnessChecker;
//! use shared::storage::InMemorySearchStore;
//!
//! let store = InMemorySearchStore::new_shared();
//! store.insert("impression-2024", Utc::now() - Duration::seconds(10)).unwrap();
//!
//! let outcome = FreshnessChecker::new(store)
//!     .check("impression-*", Some("3600"), Some("60"))
//!     .unwrap();
//!
//! assert_eq!(outcome.message(), "All ok!");
//! assert_eq!(outcome.exit_code(), 0);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod checker;
pub mod config;
pub mod models;
pub mod query;
pub mod storage;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde;
pub use serde_json;
