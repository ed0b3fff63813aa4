//! Secret backend selection.

use crate::error::Result;

/// Storage for a single secret string under a fixed identifier.
///
/// Implementations hold exactly one payload. `delete()` on a missing entry
/// succeeds.
pub trait SecretBackend: Send + Sync {
    /// Which backend variant this is
    fn kind(&self) -> BackendKind;

    /// Read the stored payload, `None` when nothing is stored
    fn read(&self) -> Result<Option<String>>;

    /// Replace the stored payload
    fn write(&self, payload: &str) -> Result<()>;

    /// Remove the stored payload
    fn delete(&self) -> Result<()>;
}

/// The two backend variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// freedesktop secret service (GNOME Keyring, KWallet)
    SecretService,
    /// Windows Credential Manager
    CredentialVault,
}

impl BackendKind {
    /// Variant used on the host this binary was built for.
    pub const fn for_host() -> Self {
        if cfg!(windows) {
            Self::CredentialVault
        } else {
            Self::SecretService
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::SecretService => "secret-service",
            Self::CredentialVault => "credential-vault",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Open the host's backend for `key`.
pub fn host_backend(key: &str) -> Box<dyn SecretBackend> {
    #[cfg(windows)]
    {
        Box::new(crate::vault::CredentialVaultBackend::new(key))
    }
    #[cfg(not(windows))]
    {
        Box::new(crate::secret_service::SecretServiceBackend::new(key))
    }
}
