use thiserror::Error;

/// Errors raised by credential storage
#[derive(Debug, Error)]
pub enum CredentialError {
    /// `get()` called while no complete bundle is held.
    ///
    /// This is a caller bug (check `has_credentials()` first), not a storage
    /// failure.
    #[error("No credentials stored")]
    NoCredentials,

    /// Secret backend could not be reached (no keyring daemon, locked
    /// collection that refused to unlock, missing subsystem)
    #[error("Secret backend unavailable: {0}")]
    Unavailable(String),

    /// Backend call failed
    #[error("Secret backend error: {0}")]
    Backend(String),

    /// Stored payload could not be decoded
    #[error("Malformed credential payload: {0}")]
    Malformed(String),

    /// Payload exceeds what the vault accepts
    #[error("Credential blob too large: {0} bytes (max {1} bytes)")]
    TooLarge(usize, usize),

    /// JSON errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

/// Result type for credential operations
pub type Result<T> = std::result::Result<T, CredentialError>;
