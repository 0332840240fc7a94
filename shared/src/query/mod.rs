//! Count-only time range queries.
//!
//! A freshness check never needs document bodies, only whether any document
//! exists in a trailing window. Queries built here therefore request
//! `size = 0` and carry a single range filter on the timestamp field.
//!
//! # Example
//!
//! ```
//! use shared::models::Seconds;
//! use shared::query::TimeRangeQuery;
//!
//! let query = TimeRangeQuery::new("impression-*", Seconds::new(300.0).unwrap());
//! assert_eq!(query.lower_bound(), "now-300s");
//! assert_eq!(query.upper_bound(), "now");
//! assert_eq!(query.path_segments(), ["impression-*", "fluentd", "_search"]);
//! ```

mod range;

pub use range::{TimeRangeQuery, DOCUMENT_TYPE, TIMESTAMP_FIELD};
