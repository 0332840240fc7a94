//! Search store trait and implementations.
//!
//! Provides the `SearchStore` trait, an `InMemorySearchStore` that evaluates
//! queries locally and an `ElasticsearchStore` that submits them over HTTP.

use crate::config::StoreConfig;
use crate::query::{TimeRangeQuery, DOCUMENT_TYPE};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Errors that can occur while querying a search store.
#[derive(Debug, Error)]
pub enum SearchStoreError {
    /// The request could not be sent or the response could not be read.
    #[error("Search request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("Search store returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, usually the store's error document.
        body: String,
    },

    /// The response body is not a search response.
    #[error("Failed to decode search response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured store URL cannot carry a search path.
    #[error("Invalid search store URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL as configured.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Failed to acquire lock on the store.
    #[error("Failed to acquire lock on search store")]
    LockError,
}

/// Result of a count-only search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchResult {
    /// Number of documents matching the query.
    pub total_hits: u64,
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: Hits,
}

#[derive(Deserialize)]
struct Hits {
    total: HitsTotal,
}

/// Servers that accept the typed `filtered` request report a bare number.
/// The `{value, relation}` form only comes from compatible stores or proxies
/// that accept the legacy request but answer in the newer response format.
#[derive(Deserialize)]
#[serde(untagged)]
enum HitsTotal {
    Count(u64),
    Tracked { value: u64 },
}

impl SearchResult {
    /// Creates a result with the given hit count.
    #[must_use]
    pub fn new(total_hits: u64) -> Self {
        Self { total_hits }
    }

    /// Returns true if at least one document matched.
    #[must_use]
    pub fn has_hits(&self) -> bool {
        self.total_hits > 0
    }

    /// Extracts `hits.total` from a raw search response.
    ///
    /// # Errors
    ///
    /// Returns [`SearchStoreError::Decode`] if the body is not valid JSON or has no `hits.total`.
    ///
    /// # Example
    ///
    /// ```
    /// use shared::storage::SearchResult;
    ///
    /// let legacy = SearchResult::from_json(br#"{"hits":{"total":7,"hits":[]}}"#).unwrap();
    /// assert_eq!(legacy.total_hits, 7);
    ///
    /// let tracked = SearchResult::from_json(
    ///     br#"{"hits":{"total":{"value":3,"relation":"eq"},"hits":[]}}"#,
    /// ).unwrap();
    /// assert_eq!(tracked.total_hits, 3);
    /// ```
    pub fn from_json(body: &[u8]) -> Result<Self, SearchStoreError> {
        let response: SearchResponse = serde_json::from_slice(body)?;
        let total_hits = match response.hits.total {
            HitsTotal::Count(count) => count,
            HitsTotal::Tracked { value } => value,
        };
        Ok(Self { total_hits })
    }
}

/// Trait for search store implementations.
///
/// Implementations must be thread-safe (Send + Sync).
pub trait SearchStore: Send + Sync {
    /// Runs a count-only query and returns the total hit count.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached or rejects the query.
    fn search(&self, query: &TimeRangeQuery) -> Result<SearchResult, SearchStoreError>;
}

/// A document held by [`InMemorySearchStore`].
#[derive(Debug, Clone)]
struct StoredDocument {
    index_name: String,
    document_type: String,
    timestamp: DateTime<Utc>,
}

/// In-memory search store implementation.
///
/// Documents are kept in a `Vec` protected by a `RwLock` and queries are
/// evaluated against the wall clock at the time of the search. Every query
/// received is recorded so callers can inspect what was asked.
///
/// Index names ending in `*` match every index with that prefix.
///
/// # Example
///
/// ```
/// use chrono::{Duration, Utc};
/// use shared::models::Seconds;
/// use shared::query::TimeRangeQuery;
/// use shared::storage::{InMemorySearchStore, SearchStore};
///
/// let store = InMemorySearchStore::new();
/// store.insert("impression-2024", Utc::now() - Duration::seconds(30)).unwrap();
///
/// let query = TimeRangeQuery::new("impression-*", Seconds::new(60.0).unwrap());
/// assert_eq!(store.search(&query).unwrap().total_hits, 1);
/// assert_eq!(store.query_count().unwrap(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemorySearchStore {
    documents: Arc<RwLock<Vec<StoredDocument>>>,
    queries: Arc<RwLock<Vec<TimeRangeQuery>>>,
}

impl InMemorySearchStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory store wrapped in an Arc.
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Inserts a document of the default type into `index_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn insert(
        &self,
        index_name: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<(), SearchStoreError> {
        self.insert_typed(index_name, DOCUMENT_TYPE, timestamp)
    }

    /// Inserts a document with an explicit type.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn insert_typed(
        &self,
        index_name: impl Into<String>,
        document_type: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<(), SearchStoreError> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| SearchStoreError::LockError)?;
        documents.push(StoredDocument {
            index_name: index_name.into(),
            document_type: document_type.into(),
            timestamp,
        });
        Ok(())
    }

    /// Returns every query received so far, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn queries(&self) -> Result<Vec<TimeRangeQuery>, SearchStoreError> {
        let queries = self.queries.read().map_err(|_| SearchStoreError::LockError)?;
        Ok(queries.clone())
    }

    /// Returns the number of queries received so far.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn query_count(&self) -> Result<usize, SearchStoreError> {
        let queries = self.queries.read().map_err(|_| SearchStoreError::LockError)?;
        Ok(queries.len())
    }

    fn index_matches(pattern: &str, index_name: &str) -> bool {
        match pattern.strip_suffix('*') {
            Some(prefix) => index_name.starts_with(prefix),
            None => pattern == index_name,
        }
    }
}

impl SearchStore for InMemorySearchStore {
    fn search(&self, query: &TimeRangeQuery) -> Result<SearchResult, SearchStoreError> {
        self.queries
            .write()
            .map_err(|_| SearchStoreError::LockError)?
            .push(query.clone());

        let documents = self
            .documents
            .read()
            .map_err(|_| SearchStoreError::LockError)?;
        let now = Utc::now();

        let total_hits = documents
            .iter()
            .filter(|doc| Self::index_matches(&query.index_name, &doc.index_name))
            .filter(|doc| doc.document_type == query.document_type)
            .filter(|doc| query.contains(doc.timestamp, now))
            .count();

        Ok(SearchResult::new(
            u64::try_from(total_hits).unwrap_or(u64::MAX),
        ))
    }
}

/// Elasticsearch-backed search store.
///
/// Submits each query as a `POST {url}/{index}/{type}/_search` request and
/// reads `hits.total` from the response. No timeout, retry or credentials are
/// configured; transport defaults apply.
#[derive(Debug, Clone)]
pub struct ElasticsearchStore {
    client: reqwest::Client,
    base_url: reqwest::Url,
}

impl ElasticsearchStore {
    /// Creates a new store for the server described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not an absolute base URL or the HTTP
    /// client cannot be built.
    pub fn new(config: &StoreConfig) -> Result<Self, SearchStoreError> {
        let invalid = |reason: String| SearchStoreError::InvalidUrl {
            url: config.url.clone(),
            reason,
        };

        let base_url = reqwest::Url::parse(&config.url).map_err(|e| invalid(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid("cannot be a base URL".to_string()));
        }

        let client = reqwest::Client::builder().build()?;

        tracing::debug!(url = %config.url, "Created search store client");

        Ok(Self {
            client,
            base_url,
        })
    }

    /// Creates a new store wrapped in an Arc.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn new_shared(config: &StoreConfig) -> Result<Arc<Self>, SearchStoreError> {
        Self::new(config).map(Arc::new)
    }

    /// Full URL a query is sent to.
    ///
    /// The index, type and endpoint are appended as separate percent-encoded
    /// segments, so an index name can never spill into the query string or
    /// fragment.
    #[must_use]
    pub fn search_url(&self, query: &TimeRangeQuery) -> reqwest::Url {
        let mut url = self.base_url.clone();
        // Base URLs were checked in `new`.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(query.path_segments());
        }
        url
    }

    /// Helper to execute async operations synchronously.
    ///
    /// # Panics
    ///
    /// Panics if called outside a multi-threaded Tokio runtime.
    fn block_on<F, T>(future: F) -> Result<T, SearchStoreError>
    where
        F: std::future::Future<Output = Result<T, SearchStoreError>>,
    {
        tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
    }
}

impl SearchStore for ElasticsearchStore {
    fn search(&self, query: &TimeRangeQuery) -> Result<SearchResult, SearchStoreError> {
        let url = self.search_url(query);
        let body = query.to_body();
        let client = self.client.clone();

        let bytes = Self::block_on(async move {
            let response = client.post(url).json(&body).send().await?;
            let status = response.status();
            let bytes = response.bytes().await?;

            if !status.is_success() {
                return Err(SearchStoreError::Status {
                    status: status.as_u16(),
                    body: String::from_utf8_lossy(&bytes).into_owned(),
                });
            }

            Ok::<_, SearchStoreError>(bytes)
        })?;

        SearchResult::from_json(&bytes)
    }
}
