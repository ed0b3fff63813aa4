//! Channel interface between the controller and the native icon loop.

use std::sync::Arc;

use crossbeam_channel::Receiver;

use crate::error::Result;
use crate::icon::TrayIconImage;
use crate::menu::TrayMenuItem;
use crate::state::TrayState;

/// User input reported by the icon loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayEvent {
    /// Left-click on the icon
    Activated,
    /// Context menu selection
    Menu(TrayMenuItem),
}

/// Messages from the controller to the icon loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayUpdate {
    State(TrayState),
    /// Remove the icon and return from [`TrayHost::run`]
    Shutdown,
}

/// Called on the icon thread for each [`TrayEvent`].
pub type EventSink = Arc<dyn Fn(TrayEvent) + Send + Sync>;

/// Native notification-area backend.
pub trait TrayHost: Send + Sync {
    /// Create the icon and run its message loop on the calling thread.
    ///
    /// Calls `on_ready` once the icon is visible; returning without having
    /// called it means the icon never appeared. Returns when
    /// [`TrayUpdate::Shutdown`] arrives or `updates` is disconnected. The
    /// icon must be gone by the time this returns.
    fn run(
        &self,
        icon: TrayIconImage,
        state: TrayState,
        updates: Receiver<TrayUpdate>,
        events: EventSink,
        on_ready: &dyn Fn(),
    ) -> Result<()>;
}

/// Native host for the current OS, if there is one.
pub fn host_tray() -> Option<Arc<dyn TrayHost>> {
    #[cfg(windows)]
    {
        Some(Arc::new(crate::windows::NativeTrayHost))
    }
    #[cfg(not(windows))]
    {
        None
    }
}
