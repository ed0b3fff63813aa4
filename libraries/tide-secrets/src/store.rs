//! Credential store over a secret backend.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::backend::{host_backend, BackendKind, SecretBackend};
use crate::bundle::{CredentialBundle, SessionTokens};
use crate::error::{CredentialError, Result};

/// Owner of the persisted credential bundle.
///
/// The bundle is loaded once at construction. `save()` and `clear()` take
/// `&mut self`, so whoever owns the store is its only writer; share it across
/// threads behind a `Mutex` held by that owner.
///
/// No method returns a backend failure. Unreadable or malformed storage is
/// logged and treated as empty; a failed write leaves the in-memory bundle
/// usable for this run only.
pub struct CredentialStore {
    session: Arc<dyn SessionTokens>,
    backend: Box<dyn SecretBackend>,
    bundle: CredentialBundle,
}

impl CredentialStore {
    /// Open the host backend under the fixed application key and load.
    ///
    /// Blocks on the backend: the caller needs the answer before it can
    /// decide whether to show a login prompt.
    pub fn initialize(session: Arc<dyn SessionTokens>) -> Self {
        Self::with_key(session, tide_core::CREDENTIAL_KEY)
    }

    /// Like [`initialize`](Self::initialize) with a custom key.
    pub fn with_key(session: Arc<dyn SessionTokens>, key: &str) -> Self {
        Self::with_backend(session, host_backend(key))
    }

    /// Load through an explicit backend.
    pub fn with_backend(session: Arc<dyn SessionTokens>, backend: Box<dyn SecretBackend>) -> Self {
        info!(backend = %backend.kind(), "Initializing credential store");

        let bundle = Self::load(backend.as_ref());
        Self {
            session,
            backend,
            bundle,
        }
    }

    fn load(backend: &dyn SecretBackend) -> CredentialBundle {
        let payload = match backend.read() {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!("No stored credentials");
                return CredentialBundle::default();
            }
            Err(e) => {
                warn!(error = %e, "Failed to read credentials, starting logged out");
                return CredentialBundle::default();
            }
        };

        match CredentialBundle::from_json(&payload) {
            Ok(bundle) => {
                debug!(complete = bundle.is_complete(), "Loaded stored credentials");
                bundle
            }
            Err(e) => {
                warn!(error = %e, "Stored credentials are malformed, resetting");
                CredentialBundle::default()
            }
        }
    }

    /// Which backend variant is in use.
    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// True iff token type, access token and refresh token are all present.
    ///
    /// Does not look at the expiry.
    pub fn has_credentials(&self) -> bool {
        self.bundle.is_complete()
    }

    /// `(token_type, access_token, refresh_token)`.
    ///
    /// Returns [`CredentialError::NoCredentials`] when called without a
    /// complete bundle; check [`has_credentials`](Self::has_credentials) first.
    pub fn get(&self) -> Result<(String, String, String)> {
        match (
            &self.bundle.token_type,
            &self.bundle.access_token,
            &self.bundle.refresh_token,
        ) {
            (Some(token_type), Some(access), Some(refresh)) => {
                Ok((token_type.clone(), access.clone(), refresh.clone()))
            }
            _ => Err(CredentialError::NoCredentials),
        }
    }

    /// Stored expiry, when present and parseable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.bundle.expires_at()
    }

    /// Capture the session's current tokens and persist them.
    ///
    /// Returns whether the backend accepted the write. The in-memory bundle
    /// is updated either way.
    pub fn save(&mut self) -> bool {
        self.bundle = CredentialBundle::capture(self.session.as_ref());

        let payload = match self.bundle.to_json() {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "Failed to encode credentials");
                return false;
            }
        };

        match self.backend.write(&payload) {
            Ok(()) => {
                info!(backend = %self.backend.kind(), "Saved credentials");
                true
            }
            Err(e) => {
                error!(
                    backend = %self.backend.kind(),
                    error = %e,
                    "Failed to save credentials, session will not survive restart"
                );
                false
            }
        }
    }

    /// Forget the bundle in memory and in the backend.
    ///
    /// Deleting an entry that is already gone is not an error.
    pub fn clear(&mut self) {
        self.bundle = CredentialBundle::default();

        match self.backend.delete() {
            Ok(()) => info!("Cleared stored credentials"),
            Err(e) => warn!(error = %e, "Failed to delete stored credentials"),
        }
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("backend", &self.backend.kind())
            .field("has_credentials", &self.has_credentials())
            .finish_non_exhaustive()
    }
}
