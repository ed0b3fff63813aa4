//! High Tide Core
//!
//! Shared building blocks for the platform integration crates.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Identity**: the application id, display name and URI scheme every
//!   OS surface registers under
//! - **State**: `MediaSessionState`, the playback snapshot pushed by the
//!   player layer into the media bridge, tray and notifications
//! - **Callbacks**: the `Callback` type used for every externally supplied
//!   handler slot
//!
//! # Example
//!
//! ```rust
//! use tide_core::MediaSessionState;
//!
//! let state = MediaSessionState::playing("Teardrop", "Massive Attack")
//!     .with_album("Mezzanine")
//!     .with_track_id("77646");
//! assert!(state.is_playing);
//! assert_eq!(state.track_id.as_deref(), Some("77646"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod callback;
pub mod identity;
pub mod state;

pub use callback::{callback, Callback};
pub use identity::{APP_ID, APP_NAME, CREDENTIAL_KEY, PROTOCOL_SCHEME, STARTUP_VALUE_NAME};
pub use state::MediaSessionState;
