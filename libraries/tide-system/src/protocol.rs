//! `tidal://` URI handler registration.

use std::io;
use std::sync::Arc;

use tide_core::PROTOCOL_SCHEME;
use tracing::{info, warn};

use crate::launch::LaunchTarget;
use crate::registry::{delete_tree, host_registry, RegistryStore};

/// Registers High Tide as the per-user handler for its URI scheme.
///
/// Layout under `HKCU\Software\Classes\<scheme>`:
///
/// | Key                  | Value          | Data                      |
/// |----------------------|----------------|---------------------------|
/// | `<scheme>`           | (default)      | `URL:TIDAL Protocol`      |
/// | `<scheme>`           | `URL Protocol` | empty                     |
/// | `DefaultIcon`        | (default)      | `<exe>,0`                 |
/// | `shell\open\command` | (default)      | `"<exe>" "%1"`            |
pub struct ProtocolRegistrar {
    registry: Arc<dyn RegistryStore>,
    target: LaunchTarget,
    scheme: String,
}

impl ProtocolRegistrar {
    pub fn new(target: LaunchTarget) -> Self {
        Self::with_registry(host_registry(), target)
    }

    pub fn with_registry(registry: Arc<dyn RegistryStore>, target: LaunchTarget) -> Self {
        Self {
            registry,
            target,
            scheme: PROTOCOL_SCHEME.to_string(),
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Root key of the handler registration.
    pub fn root_key(&self) -> String {
        format!(r"Software\Classes\{}", self.scheme)
    }

    /// Command the shell runs for a link.
    pub fn command(&self) -> String {
        self.target.command_with_argument()
    }

    /// Whether the scheme's root key exists.
    pub fn is_enabled(&self) -> bool {
        match self.registry.key_exists(&self.root_key()) {
            Ok(exists) => exists,
            Err(e) if e.kind() == io::ErrorKind::Unsupported => false,
            Err(e) => {
                warn!(error = %e, "Failed to check protocol handler status");
                false
            }
        }
    }

    /// Register or unregister the handler.
    pub fn set_enabled(&self, enabled: bool) -> bool {
        let result = if enabled {
            self.register()
        } else {
            delete_tree(self.registry.as_ref(), &self.root_key())
        };

        match result {
            Ok(()) => {
                if enabled {
                    info!(scheme = %self.scheme, command = %self.command(), "Registered protocol handler");
                } else {
                    info!(scheme = %self.scheme, "Unregistered protocol handler");
                }
                true
            }
            Err(e) => {
                warn!(scheme = %self.scheme, enabled, error = %e, "Failed to update protocol handler");
                false
            }
        }
    }

    fn register(&self) -> io::Result<()> {
        let root = self.root_key();
        let description = format!("URL:{} Protocol", self.scheme.to_uppercase());

        self.registry.set_value(&root, "", &description)?;
        self.registry.set_value(&root, "URL Protocol", "")?;
        self.registry.set_value(
            &format!(r"{root}\DefaultIcon"),
            "",
            &self.target.icon_resource(),
        )?;
        self.registry
            .set_value(&format!(r"{root}\shell\open\command"), "", &self.command())
    }
}

impl std::fmt::Debug for ProtocolRegistrar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProtocolRegistrar")
            .field("scheme", &self.scheme)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}
