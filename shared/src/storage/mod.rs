//! Search store trait and implementations.
//!
//! The freshness checker only needs one operation from a store: run a
//! count-only [`TimeRangeQuery`](crate::query::TimeRangeQuery) and report the
//! total hit count. `SearchStore` captures that, with an in-memory
//! implementation for development and tests and an HTTP implementation for
//! Elasticsearch-compatible servers.

pub mod search_store;

pub use search_store::{
    ElasticsearchStore, InMemorySearchStore, SearchResult, SearchStore, SearchStoreError,
};
