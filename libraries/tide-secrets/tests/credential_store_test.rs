//! Credential store behaviour against in-memory and failing backends.

mod common;

use std::sync::Arc;

use common::{LiveSession, MemoryBackend, UnavailableBackend};
use tide_secrets::{CredentialBundle, CredentialError, CredentialStore, SessionSnapshot};

fn bearer_session() -> Arc<LiveSession> {
    LiveSession::new("Bearer", "A", "R", "2025-01-01")
}

fn empty_session() -> Arc<SessionSnapshot> {
    Arc::new(SessionSnapshot::default())
}

#[test]
fn test_save_then_fresh_instance_loads_equal_bundle() {
    let backend = MemoryBackend::default();

    let mut store = CredentialStore::with_backend(bearer_session(), Box::new(backend.clone()));
    assert!(!store.has_credentials());
    assert!(store.save());

    let fresh = CredentialStore::with_backend(empty_session(), Box::new(backend.clone()));
    assert!(fresh.has_credentials());
    assert_eq!(
        fresh.get().unwrap(),
        ("Bearer".to_string(), "A".to_string(), "R".to_string())
    );

    let stored = CredentialBundle::from_json(&backend.payload().unwrap()).unwrap();
    assert_eq!(stored.expiry_time.as_deref(), Some("2025-01-01"));
}

#[test]
fn test_save_reads_session_at_call_time() {
    let backend = MemoryBackend::default();
    let session = bearer_session();

    let mut store = CredentialStore::with_backend(session.clone(), Box::new(backend.clone()));
    session.set("Bearer", "rotated-access", "rotated-refresh", "2026-01-01");
    store.save();

    let (_, access, refresh) = store.get().unwrap();
    assert_eq!(access, "rotated-access");
    assert_eq!(refresh, "rotated-refresh");

    let fresh = CredentialStore::with_backend(empty_session(), Box::new(backend));
    assert_eq!(fresh.get().unwrap().1, "rotated-access");
}

#[test]
fn test_clear_leaves_no_residual_data() {
    let backend = MemoryBackend::default();

    let mut store = CredentialStore::with_backend(bearer_session(), Box::new(backend.clone()));
    store.save();
    store.clear();

    assert!(!store.has_credentials());
    assert!(backend.payload().is_none());

    let fresh = CredentialStore::with_backend(empty_session(), Box::new(backend));
    assert!(!fresh.has_credentials());
}

#[test]
fn test_clear_twice_is_idempotent() {
    let backend = MemoryBackend::default();
    let mut store = CredentialStore::with_backend(bearer_session(), Box::new(backend.clone()));
    store.save();

    store.clear();
    store.clear();

    assert!(!store.has_credentials());
    assert_eq!(*backend.deletes.lock().unwrap(), 2);
}

#[test]
fn test_get_on_empty_store_is_distinct_error() {
    let store = CredentialStore::with_backend(empty_session(), Box::new(MemoryBackend::default()));
    assert!(matches!(store.get(), Err(CredentialError::NoCredentials)));
}

#[test]
fn test_malformed_payload_is_treated_as_absent() {
    let backend = MemoryBackend::with_payload("{not json");
    let store = CredentialStore::with_backend(empty_session(), Box::new(backend));

    assert!(!store.has_credentials());
    assert!(matches!(store.get(), Err(CredentialError::NoCredentials)));
}

#[test]
fn test_partial_payload_does_not_count() {
    let backend = MemoryBackend::with_payload(r#"{"token-type":"Bearer","refresh-token":"R"}"#);
    let store = CredentialStore::with_backend(empty_session(), Box::new(backend));
    assert!(!store.has_credentials());
}

#[test]
fn test_expired_bundle_still_counts() {
    let backend = MemoryBackend::with_payload(
        r#"{"token-type":"Bearer","access-token":"A","refresh-token":"R","expiry-time":"2000-01-01"}"#,
    );
    let store = CredentialStore::with_backend(empty_session(), Box::new(backend));

    assert!(store.has_credentials());
    assert!(store.expires_at().unwrap() < chrono::Utc::now());
}

#[test]
fn test_unavailable_backend_degrades_to_empty() {
    let mut store = CredentialStore::with_backend(bearer_session(), Box::new(UnavailableBackend));
    assert!(!store.has_credentials());

    // Write fails but the session stays usable for this run
    assert!(!store.save());
    assert!(store.has_credentials());
    assert_eq!(store.get().unwrap().0, "Bearer");

    store.clear();
    assert!(!store.has_credentials());
}
