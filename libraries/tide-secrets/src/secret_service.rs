//! freedesktop secret service backend.

use std::collections::HashMap;

use secret_service::blocking::{Collection, SecretService};
use secret_service::EncryptionType;
use tracing::{debug, info};

use crate::backend::{BackendKind, SecretBackend};
use crate::error::{CredentialError, Result};

/// Schema name items are tagged with (libsecret compatible).
pub const SCHEMA_NAME: &str = tide_core::APP_ID;

/// Attribute libsecret stores the schema name under.
const SCHEMA_ATTRIBUTE: &str = "xdg:schema";

/// Keyring item in the default collection, found by its schema attribute.
pub struct SecretServiceBackend {
    label: String,
}

impl SecretServiceBackend {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
        }
    }

    fn attributes() -> HashMap<&'static str, &'static str> {
        HashMap::from([(SCHEMA_ATTRIBUTE, SCHEMA_NAME)])
    }

    fn connect() -> Result<SecretService<'static>> {
        SecretService::connect(EncryptionType::Dh)
            .map_err(|e| CredentialError::Unavailable(e.to_string()))
    }

    /// Unlock the default collection.
    ///
    /// On a locked or freshly started session every search silently comes
    /// back empty, so this runs before each access.
    fn unlocked_collection<'a>(service: &'a SecretService<'a>) -> Result<Collection<'a>> {
        let collection = service
            .get_default_collection()
            .map_err(|e| CredentialError::Unavailable(e.to_string()))?;

        let locked = collection
            .is_locked()
            .map_err(|e| CredentialError::Backend(e.to_string()))?;
        if locked {
            info!("Default keyring collection is locked, requesting unlock");
            collection
                .unlock()
                .map_err(|e| CredentialError::Unavailable(e.to_string()))?;
        }

        Ok(collection)
    }
}

impl SecretBackend for SecretServiceBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::SecretService
    }

    fn read(&self) -> Result<Option<String>> {
        let service = Self::connect()?;
        let collection = Self::unlocked_collection(&service)?;

        let items = collection
            .search_items(Self::attributes())
            .map_err(|e| CredentialError::Backend(e.to_string()))?;
        let Some(item) = items.first() else {
            debug!(schema = SCHEMA_NAME, "No keyring item found");
            return Ok(None);
        };

        let secret = item
            .get_secret()
            .map_err(|e| CredentialError::Backend(e.to_string()))?;
        let payload =
            String::from_utf8(secret).map_err(|e| CredentialError::Malformed(e.to_string()))?;

        Ok(Some(payload))
    }

    fn write(&self, payload: &str) -> Result<()> {
        let service = Self::connect()?;
        let collection = Self::unlocked_collection(&service)?;

        collection
            .create_item(
                &self.label,
                Self::attributes(),
                payload.as_bytes(),
                true,
                "text/plain",
            )
            .map_err(|e| CredentialError::Backend(e.to_string()))?;

        debug!(label = %self.label, "Stored keyring item");
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        let service = Self::connect()?;
        let collection = Self::unlocked_collection(&service)?;

        let items = collection
            .search_items(Self::attributes())
            .map_err(|e| CredentialError::Backend(e.to_string()))?;
        for item in &items {
            item.delete()
                .map_err(|e| CredentialError::Backend(e.to_string()))?;
        }

        debug!(removed = items.len(), "Cleared keyring items");
        Ok(())
    }
}
