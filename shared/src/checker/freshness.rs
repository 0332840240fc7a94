//! Freshness checker.
//!
//! Queries the critical window first and, only if it holds documents, the
//! warning window. A run issues at most two queries.

use std::sync::Arc;

use thiserror::Error;

use crate::models::{CheckOutcome, CheckRequest, Seconds, Status, ValidationError};
use crate::query::TimeRangeQuery;
use crate::storage::{SearchStore, SearchStoreError};

/// Errors that abort a check without producing an outcome.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Check input failed validation. No query was issued.
    #[error(transparent)]
    InvalidParameter(#[from] ValidationError),

    /// The search store failed.
    #[error(transparent)]
    StoreFailure(#[from] SearchStoreError),
}

/// Runs freshness checks against a search store.
#[derive(Clone)]
pub struct FreshnessChecker {
    store: Arc<dyn SearchStore>,
}

impl std::fmt::Debug for FreshnessChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FreshnessChecker").finish_non_exhaustive()
    }
}

impl FreshnessChecker {
    /// Creates a checker backed by `store`.
    #[must_use]
    pub fn new(store: Arc<dyn SearchStore>) -> Self {
        Self { store }
    }

    /// Validates raw input and runs the check.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::InvalidParameter`] before any query if an
    /// interval is invalid, and [`CheckError::StoreFailure`] if a query fails.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::{Duration, Utc};
    /// use shared::checker::FreshnessChecker;
    /// use shared::models::Status;
    /// use shared::storage::InMemorySearchStore;
    ///
    /// let store = InMemorySearchStore::new_shared();
    /// store.insert("logs", Utc::now() - Duration::seconds(120)).unwrap();
    ///
    /// let checker = FreshnessChecker::new(store);
    /// let outcome = checker.check("logs", Some("600"), Some("60")).unwrap();
    /// assert_eq!(outcome.status, Status::Warning);
    /// assert_eq!(outcome.message(), "Warning - Collection logs.");
    /// ```
    pub fn check(
        &self,
        index_name: &str,
        critical: Option<&str>,
        warning: Option<&str>,
    ) -> Result<CheckOutcome, CheckError> {
        let request = CheckRequest::from_raw(index_name, critical, warning)?;
        Ok(self.run(&request)?)
    }

    /// Runs the check for an already validated request.
    ///
    /// A request without a warning window that passes the critical window is OK.
    ///
    /// # Errors
    ///
    /// Returns an error if a store query fails. Store errors are not retried.
    pub fn run(&self, request: &CheckRequest) -> Result<CheckOutcome, SearchStoreError> {
        let index = request.index_name.as_str();

        if !self.has_documents(index, request.critical)? {
            return Ok(Self::finish(Status::Critical, index));
        }

        let Some(warning) = request.warning else {
            return Ok(Self::finish(Status::Ok, index));
        };

        if self.has_documents(index, warning)? {
            Ok(Self::finish(Status::Ok, index))
        } else {
            Ok(Self::finish(Status::Warning, index))
        }
    }

    fn has_documents(&self, index: &str, window: Seconds) -> Result<bool, SearchStoreError> {
        let query = TimeRangeQuery::new(index, window);

        let result = self.store.search(&query).inspect_err(|e| {
            tracing::error!(index, window = %window, error = %e, "Search store query failed");
        })?;

        tracing::debug!(
            index,
            from = %query.lower_bound(),
            to = query.upper_bound(),
            total_hits = result.total_hits,
            "Window queried"
        );

        Ok(result.has_hits())
    }

    fn finish(status: Status, index: &str) -> CheckOutcome {
        tracing::info!(index, %status, "Freshness check finished");
        CheckOutcome::new(status, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SearchResult;
    use std::sync::Mutex;

    /// Store answering with scripted hit counts, in order.
    struct ScriptedStore {
        hits: Mutex<Vec<u64>>,
        seen: Mutex<Vec<TimeRangeQuery>>,
    }

    impl ScriptedStore {
        fn new(hits: &[u64]) -> Arc<Self> {
            Arc::new(Self {
                hits: Mutex::new(hits.iter().rev().copied().collect()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn seen(&self) -> Vec<TimeRangeQuery> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl SearchStore for ScriptedStore {
        fn search(&self, query: &TimeRangeQuery) -> Result<SearchResult, SearchStoreError> {
            self.seen.lock().unwrap().push(query.clone());
            let hits = self.hits.lock().unwrap().pop().expect("unexpected query");
            Ok(SearchResult::new(hits))
        }
    }

    struct FailingStore;

    impl SearchStore for FailingStore {
        fn search(&self, _query: &TimeRangeQuery) -> Result<SearchResult, SearchStoreError> {
            Err(SearchStoreError::Status {
                status: 404,
                body: "index_not_found_exception".to_string(),
            })
        }
    }

    fn request(critical: &str, warning: Option<&str>) -> CheckRequest {
        CheckRequest::from_raw("impression-*", Some(critical), warning).unwrap()
    }

    #[test]
    fn test_critical_when_no_hits() {
        let store = ScriptedStore::new(&[0]);
        let checker = FreshnessChecker::new(store.clone());

        let outcome = checker.run(&request("3600", Some("600"))).unwrap();

        assert_eq!(outcome.status, Status::Critical);
        assert_eq!(outcome.exit_code(), 2);
        assert!(outcome.message().contains("impression-*"));
        assert_eq!(store.seen().len(), 1);
    }

    #[test]
    fn test_ok_without_warning_window() {
        let store = ScriptedStore::new(&[5]);
        let checker = FreshnessChecker::new(store.clone());

        let outcome = checker.run(&request("3600", None)).unwrap();

        assert_eq!(outcome.status, Status::Ok);
        assert_eq!(outcome.exit_code(), 0);
        assert_eq!(store.seen().len(), 1);
    }

    #[test]
    fn test_warning_when_warning_window_empty() {
        let store = ScriptedStore::new(&[5, 0]);
        let checker = FreshnessChecker::new(store.clone());

        let outcome = checker.run(&request("3600", Some("600"))).unwrap();

        assert_eq!(outcome.status, Status::Warning);
        assert_eq!(outcome.exit_code(), 1);
        assert_eq!(outcome.message(), "Warning - Collection impression-*.");
    }

    #[test]
    fn test_ok_when_both_windows_have_hits() {
        let store = ScriptedStore::new(&[5, 2]);
        let checker = FreshnessChecker::new(store.clone());

        let outcome = checker.run(&request("3600", Some("600"))).unwrap();

        assert_eq!(outcome.status, Status::Ok);
        assert_eq!(outcome.message(), "All ok!");
    }

    #[test]
    fn test_critical_window_is_queried_first() {
        let store = ScriptedStore::new(&[1, 1]);
        let checker = FreshnessChecker::new(store.clone());

        checker.run(&request("3600", Some("600"))).unwrap();

        let seen = store.seen();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].lower_bound(), "now-3600s");
        assert_eq!(seen[1].lower_bound(), "now-600s");
        assert!(seen.iter().all(|q| q.index_name == "impression-*"));
    }

    #[test]
    fn test_store_failure_propagates() {
        let checker = FreshnessChecker::new(Arc::new(FailingStore));

        let result = checker.run(&request("3600", None));

        assert!(matches!(
            result,
            Err(SearchStoreError::Status { status: 404, .. })
        ));
    }

    #[test]
    fn test_invalid_interval_issues_no_query() {
        let store = ScriptedStore::new(&[]);
        let checker = FreshnessChecker::new(store.clone());

        let result = checker.check("logs", Some("0"), None);

        assert!(matches!(result, Err(CheckError::InvalidParameter(_))));
        assert!(store.seen().is_empty());
    }

    #[test]
    fn test_check_maps_store_failure() {
        let checker = FreshnessChecker::new(Arc::new(FailingStore));

        let result = checker.check("logs", Some("60"), None);

        assert!(matches!(result, Err(CheckError::StoreFailure(_))));
    }
}
