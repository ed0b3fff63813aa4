//! High Tide Media Controls
//!
//! Publishes playback state to the OS now-playing surface (the Windows System
//! Media Transport Controls) and forwards media-key presses back to the
//! player.
//!
//! # Lifecycle
//!
//! `Uninitialized -> Initialized -> ShutDown`. Acquiring the native session is
//! best effort: when it fails the bridge stays uninitialized and every update
//! is a silent no-op, so the rest of the application never has to care.
//!
//! # Threads
//!
//! - Updates are pushed from the UI thread and never block on I/O.
//! - Cover art is resolved to a native stream on one background worker with a
//!   bounded queue; a newer track supersedes queued work for an older one.
//! - Button callbacks run on the platform's event thread, in delivery order.
//!
//! # Example
//!
//! ```no_run
//! use tide_media_controls::{MediaCallbacks, MediaSurfaceBridge};
//!
//! let callbacks = MediaCallbacks::new()
//!     .on_play(|| println!("play"))
//!     .on_pause(|| println!("pause"));
//!
//! let mut bridge = MediaSurfaceBridge::new(callbacks);
//! bridge.initialize();
//! bridge.update_metadata("Teardrop", "Massive Attack", "Mezzanine", None);
//! bridge.update_playback_status(true);
//! bridge.shutdown();
//! ```

mod bridge;
mod button;
mod callbacks;
mod error;
mod session;
mod thumbnail;

#[cfg(windows)]
mod smtc;

pub use bridge::{BridgeState, MediaSurfaceBridge, DEFAULT_THUMBNAIL_QUEUE};
pub use button::MediaButton;
pub use callbacks::MediaCallbacks;
pub use error::{MediaControlError, Result};
pub use session::{
    host_provider, ButtonHandler, MediaSession, MediaSessionProvider, PlaybackStatus,
    TrackMetadata, UnsupportedProvider,
};

#[cfg(windows)]
pub use smtc::SmtcProvider;
