//! "Now playing" notifications.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use tracing::{debug, warn};

use crate::error::Result;

/// A notification ready to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub message: String,
    /// Only set when the file exists
    pub icon: Option<PathBuf>,
}

impl Toast {
    pub fn new(title: impl Into<String>, message: impl Into<String>, icon: Option<&Path>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            icon: icon.filter(|path| path.is_file()).map(Path::to_path_buf),
        }
    }
}

/// Displays toasts. Called from a short-lived background thread.
pub trait Toaster: Send + Sync {
    fn show(&self, toast: &Toast) -> Result<()>;
}

/// Native toaster for the current OS, if there is one.
pub fn host_toaster() -> Option<Arc<dyn Toaster>> {
    #[cfg(windows)]
    {
        Some(Arc::new(crate::toast::WindowsToaster::new(tide_core::APP_ID)))
    }
    #[cfg(not(windows))]
    {
        None
    }
}

/// Shows a toast when the track changes.
///
/// Repeated calls for the same track id are dropped, so the player can call
/// [`show_now_playing`](Self::show_now_playing) on every state change.
pub struct NotificationService {
    toaster: Option<Arc<dyn Toaster>>,
    enabled: bool,
    last_track_id: Option<String>,
}

impl NotificationService {
    pub fn new() -> Self {
        Self::with_toaster(host_toaster())
    }

    pub fn with_toaster(toaster: Option<Arc<dyn Toaster>>) -> Self {
        Self {
            toaster,
            enabled: true,
            last_track_id: None,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        debug!(enabled, "Notifications toggled");
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether a toast can be shown at all.
    pub fn is_available(&self) -> bool {
        self.enabled && self.toaster.is_some()
    }

    /// Announce a track. Returns `true` if a toast was dispatched.
    ///
    /// Skipped when disabled or when `track_id` matches the last announced
    /// track. A call without an id is always shown and resets the memory.
    pub fn show_now_playing(
        &mut self,
        title: &str,
        artist: &str,
        album: &str,
        icon: Option<&Path>,
        track_id: Option<&str>,
    ) -> bool {
        if !self.is_available() {
            return false;
        }

        if track_id.is_some() && track_id == self.last_track_id.as_deref() {
            debug!(track_id, "Track already announced");
            return false;
        }
        self.last_track_id = track_id.map(str::to_string);

        let message = if album.is_empty() {
            artist.to_string()
        } else {
            format!("{artist} • {album}")
        };

        self.dispatch(Toast::new(title, message, icon))
    }

    /// Show an arbitrary toast. Not subject to de-duplication.
    pub fn show_message(&self, title: &str, message: &str, icon: Option<&Path>) -> bool {
        if !self.is_available() {
            return false;
        }
        self.dispatch(Toast::new(title, message, icon))
    }

    fn dispatch(&self, toast: Toast) -> bool {
        let Some(toaster) = self.toaster.clone() else {
            return false;
        };

        let spawned = thread::Builder::new()
            .name("toast".into())
            .spawn(move || {
                if let Err(e) = toaster.show(&toast) {
                    warn!(title = %toast.title, error = %e, "Failed to show notification");
                }
            });

        match spawned {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Failed to spawn notification thread");
                false
            }
        }
    }
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService")
            .field("available", &self.toaster.is_some())
            .field("enabled", &self.enabled)
            .field("last_track_id", &self.last_track_id)
            .finish()
    }
}

/// Escape text for inclusion in toast XML.
pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// `ToastGeneric` document for `toast`.
pub(crate) fn toast_xml(toast: &Toast) -> String {
    let image = toast
        .icon
        .as_ref()
        .map(|icon| {
            format!(
                r#"<image placement="appLogoOverride" src="{}"/>"#,
                escape_xml(&icon.display().to_string())
            )
        })
        .unwrap_or_default();

    format!(
        r#"<toast><visual><binding template="ToastGeneric"><text>{}</text><text>{}</text>{}</binding></visual></toast>"#,
        escape_xml(&toast.title),
        escape_xml(&toast.message),
        image
    )
}
