//! Shared fakes for credential store tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use tide_secrets::{BackendKind, CredentialError, SecretBackend, SessionTokens};

/// Backend over shared memory; clones see the same slot, like two store
/// instances pointed at one keyring.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    slot: Arc<Mutex<Option<String>>>,
    pub deletes: Arc<Mutex<usize>>,
}

impl MemoryBackend {
    pub fn with_payload(payload: &str) -> Self {
        let backend = Self::default();
        *backend.slot.lock().unwrap() = Some(payload.to_string());
        backend
    }

    pub fn payload(&self) -> Option<String> {
        self.slot.lock().unwrap().clone()
    }
}

impl SecretBackend for MemoryBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::for_host()
    }

    fn read(&self) -> tide_secrets::Result<Option<String>> {
        Ok(self.slot.lock().unwrap().clone())
    }

    fn write(&self, payload: &str) -> tide_secrets::Result<()> {
        *self.slot.lock().unwrap() = Some(payload.to_string());
        Ok(())
    }

    fn delete(&self) -> tide_secrets::Result<()> {
        *self.deletes.lock().unwrap() += 1;
        self.slot.lock().unwrap().take();
        Ok(())
    }
}

/// Backend whose every call fails, like a headless session with no keyring.
pub struct UnavailableBackend;

impl SecretBackend for UnavailableBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::for_host()
    }

    fn read(&self) -> tide_secrets::Result<Option<String>> {
        Err(CredentialError::Unavailable("no keyring daemon".into()))
    }

    fn write(&self, _payload: &str) -> tide_secrets::Result<()> {
        Err(CredentialError::Unavailable("no keyring daemon".into()))
    }

    fn delete(&self) -> tide_secrets::Result<()> {
        Err(CredentialError::Unavailable("no keyring daemon".into()))
    }
}

/// Session whose tokens can rotate after the store is built.
#[derive(Default)]
pub struct LiveSession {
    fields: Mutex<[String; 4]>,
}

impl LiveSession {
    pub fn new(token_type: &str, access: &str, refresh: &str, expiry: &str) -> Arc<Self> {
        let session = Self::default();
        session.set(token_type, access, refresh, expiry);
        Arc::new(session)
    }

    pub fn set(&self, token_type: &str, access: &str, refresh: &str, expiry: &str) {
        *self.fields.lock().unwrap() = [
            token_type.to_string(),
            access.to_string(),
            refresh.to_string(),
            expiry.to_string(),
        ];
    }
}

impl SessionTokens for LiveSession {
    fn token_type(&self) -> String {
        self.fields.lock().unwrap()[0].clone()
    }

    fn access_token(&self) -> String {
        self.fields.lock().unwrap()[1].clone()
    }

    fn refresh_token(&self) -> String {
        self.fields.lock().unwrap()[2].clone()
    }

    fn expiry_time(&self) -> String {
        self.fields.lock().unwrap()[3].clone()
    }
}
