//! High Tide System Integration
//!
//! The smaller OS touch points:
//!
//! - [`NotificationService`]: "now playing" toasts, de-duplicated per track
//! - [`StartupRegistrar`]: launch at login (`HKCU\...\Run`)
//! - [`ProtocolRegistrar`]: `tidal://` URI handler (`HKCU\Software\Classes`)
//! - [`parse_tidal_link`]: turns the URI the handler receives into a target
//!
//! Registry access goes through [`RegistryStore`] so the registrars can be
//! exercised without Windows. On other platforms the registrars report
//! "not enabled" and refuse to change anything.

mod deep_link;
mod error;
mod launch;
mod notification;
mod protocol;
mod registry;
mod startup;

#[cfg(windows)]
mod toast;

pub use deep_link::{parse_tidal_link, LinkKind, TidalLink};
pub use error::{Result, SystemError};
pub use launch::LaunchTarget;
pub use notification::{host_toaster, NotificationService, Toast, Toaster};
pub use protocol::ProtocolRegistrar;
pub use registry::{delete_tree, host_registry, MemoryRegistry, RegistryStore, UnsupportedRegistry};
pub use startup::{StartupRegistrar, RUN_KEY};

#[cfg(windows)]
pub use registry::WindowsRegistry;
#[cfg(windows)]
pub use toast::WindowsToaster;
