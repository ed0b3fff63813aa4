//! Launch at login.

use std::io;
use std::sync::Arc;

use tide_core::STARTUP_VALUE_NAME;
use tracing::{debug, info, warn};

use crate::launch::LaunchTarget;
use crate::registry::{host_registry, RegistryStore};

/// Per-user autostart list
pub const RUN_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Run";

/// Adds or removes High Tide from the per-user autostart list.
pub struct StartupRegistrar {
    registry: Arc<dyn RegistryStore>,
    target: LaunchTarget,
}

impl StartupRegistrar {
    pub fn new(target: LaunchTarget) -> Self {
        Self::with_registry(host_registry(), target)
    }

    pub fn with_registry(registry: Arc<dyn RegistryStore>, target: LaunchTarget) -> Self {
        Self { registry, target }
    }

    /// Command written to the autostart entry.
    pub fn command(&self) -> String {
        self.target.command()
    }

    /// Whether an autostart entry exists. Lookup failures count as "no".
    pub fn is_enabled(&self) -> bool {
        match self.registry.get_value(RUN_KEY, STARTUP_VALUE_NAME) {
            Ok(value) => value.is_some(),
            Err(e) if e.kind() == io::ErrorKind::Unsupported => false,
            Err(e) => {
                warn!(error = %e, "Failed to check startup status");
                false
            }
        }
    }

    /// Write or remove the autostart entry. Removing an entry that does not
    /// exist succeeds.
    pub fn set_enabled(&self, enabled: bool) -> bool {
        let result = if enabled {
            let command = self.command();
            let written = self.registry.set_value(RUN_KEY, STARTUP_VALUE_NAME, &command);
            if written.is_ok() {
                info!(%command, "Enabled startup");
            }
            written
        } else {
            match self.registry.delete_value(RUN_KEY, STARTUP_VALUE_NAME) {
                Ok(()) => {
                    info!("Disabled startup");
                    Ok(())
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!("Startup already disabled");
                    Ok(())
                }
                Err(e) => Err(e),
            }
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(enabled, error = %e, "Failed to set startup status");
                false
            }
        }
    }
}

impl std::fmt::Debug for StartupRegistrar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StartupRegistrar")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}
