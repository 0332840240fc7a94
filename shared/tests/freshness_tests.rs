//! End-to-end freshness checks against the in-memory search store.

use chrono::{Duration, Utc};
use shared::checker::{CheckError, FreshnessChecker};
use shared::models::Status;
use shared::storage::InMemorySearchStore;
use std::sync::Arc;

fn store_with_document_aged(seconds: i64) -> Arc<InMemorySearchStore> {
    let store = InMemorySearchStore::new_shared();
    store
        .insert("impression-2024.10.16", Utc::now() - Duration::seconds(seconds))
        .unwrap();
    store
}

#[test]
fn test_empty_index_is_critical() {
    let store = InMemorySearchStore::new_shared();
    let checker = FreshnessChecker::new(store.clone());

    let outcome = checker
        .check("impression-*", Some("3600"), Some("300"))
        .unwrap();

    assert_eq!(outcome.status, Status::Critical);
    assert_eq!(outcome.exit_code(), 2);
    assert_eq!(outcome.message(), "Critical - Collection impression-*.");
    assert_eq!(store.query_count().unwrap(), 1);
}

#[test]
fn test_stale_index_is_critical() {
    let store = store_with_document_aged(7200);
    let checker = FreshnessChecker::new(store);

    let outcome = checker.check("impression-*", Some("3600"), None).unwrap();

    assert_eq!(outcome.status, Status::Critical);
}

#[test]
fn test_lagging_index_is_warning() {
    let store = store_with_document_aged(1200);
    let checker = FreshnessChecker::new(store.clone());

    let outcome = checker
        .check("impression-*", Some("3600"), Some("300"))
        .unwrap();

    assert_eq!(outcome.status, Status::Warning);
    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(outcome.message(), "Warning - Collection impression-*.");
    assert_eq!(store.query_count().unwrap(), 2);
}

#[test]
fn test_fresh_index_is_ok() {
    let store = store_with_document_aged(30);
    let checker = FreshnessChecker::new(store.clone());

    let outcome = checker
        .check("impression-*", Some("3600"), Some("300"))
        .unwrap();

    assert_eq!(outcome.status, Status::Ok);
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(outcome.message(), "All ok!");

    let queries = store.queries().unwrap();
    assert_eq!(queries[0].lower_bound(), "now-3600s");
    assert_eq!(queries[1].lower_bound(), "now-300s");
}

#[test]
fn test_passing_critical_without_warning_is_ok() {
    let store = store_with_document_aged(1200);
    let checker = FreshnessChecker::new(store.clone());

    let outcome = checker.check("impression-*", Some("3600"), None).unwrap();

    assert_eq!(outcome.status, Status::Ok);
    assert_eq!(outcome.message(), "All ok!");
    assert_eq!(store.query_count().unwrap(), 1);
}

#[test]
fn test_other_index_does_not_count() {
    let store = store_with_document_aged(30);
    let checker = FreshnessChecker::new(store);

    let outcome = checker.check("click-*", Some("3600"), None).unwrap();

    assert_eq!(outcome.status, Status::Critical);
    assert_eq!(outcome.message(), "Critical - Collection click-*.");
}

#[test]
fn test_invalid_thresholds_abort_before_querying() {
    let store = store_with_document_aged(30);
    let checker = FreshnessChecker::new(store.clone());

    for (critical, warning) in [
        (None, None),
        (Some("0"), None),
        (Some("-60"), None),
        (Some("an hour"), None),
        (Some("3600"), Some("0")),
        (Some("3600"), Some("five")),
    ] {
        let result = checker.check("impression-*", critical, warning);
        assert!(
            matches!(result, Err(CheckError::InvalidParameter(_))),
            "expected InvalidParameter for {critical:?}/{warning:?}"
        );
    }

    assert_eq!(store.query_count().unwrap(), 0);
}
