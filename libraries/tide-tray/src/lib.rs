//! High Tide Tray
//!
//! Notification-area icon with a playback menu. The icon and its message loop
//! live on one dedicated thread for the lifetime of the icon; the owner talks
//! to it over a channel and receives menu clicks through callbacks that run
//! on that thread.
//!
//! ```text
//! Show High Tide      (default, also left-click)
//! ──────────────
//! Play | Pause        (follows playback state)
//! Next
//! Previous
//! ──────────────
//! Quit
//! ```
//!
//! Only Windows has a native host. Elsewhere [`TrayController::start`]
//! returns `false` and the controller stays inert.

mod controller;
mod error;
mod host;
mod icon;
mod menu;
mod state;

#[cfg(windows)]
mod windows;

pub use controller::{TrayCallbacks, TrayController};
pub use error::{Result, TrayError};
pub use host::{host_tray, EventSink, TrayEvent, TrayHost, TrayUpdate};
pub use icon::{load_icon, placeholder, rasterize_svg, TrayIconImage, ICON_SIZE};
pub use menu::{MenuEntry, TrayMenuItem, MENU_LAYOUT};
pub use state::{TrayState, TOOLTIP_LIMIT};
