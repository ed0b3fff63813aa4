//! High Tide Secrets - session credential storage
//!
//! Persists the credential bundle (token type, access token, refresh token,
//! expiry) that lets the client resume a TIDAL session without a new login.
//!
//! # Backends
//!
//! The two desktop platforms share no secret API, so the bundle format is
//! fixed (JSON) and only the backend varies:
//!
//! - **Secret service** (Linux and other freedesktop hosts): one item in the
//!   default keyring collection, looked up by its schema attribute. The
//!   collection is unlocked before every access.
//! - **Credential vault** (Windows): a generic credential whose blob holds
//!   the JSON as UTF-16LE, persisted per machine.
//!
//! The backend is picked once, from the host platform, when the store is
//! created. Nothing else in the application branches on platform.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tide_secrets::{CredentialStore, SessionSnapshot};
//!
//! let session = Arc::new(SessionSnapshot::default());
//! let store = CredentialStore::initialize(session);
//!
//! if store.has_credentials() {
//!     let (token_type, access, refresh) = store.get().expect("checked above");
//!     println!("resuming {token_type} session ({} byte token)", access.len() + refresh.len());
//! }
//! ```

mod backend;
mod blob;
mod bundle;
mod error;
mod store;

#[cfg(not(windows))]
mod secret_service;
#[cfg(windows)]
mod vault;

pub use backend::{host_backend, BackendKind, SecretBackend};
pub use blob::VaultBlob;
pub use bundle::{CredentialBundle, SessionSnapshot, SessionTokens};
pub use error::{CredentialError, Result};
pub use store::CredentialStore;

#[cfg(not(windows))]
pub use secret_service::{SecretServiceBackend, SCHEMA_NAME};
#[cfg(windows)]
pub use vault::CredentialVaultBackend;
