//! Seam between the bridge and the native now-playing session.

use std::path::Path;
use std::sync::Arc;

use crate::button::MediaButton;
use crate::error::{MediaControlError, Result};

/// Receives button presses from the native event thread.
pub type ButtonHandler = Arc<dyn Fn(MediaButton) + Send + Sync>;

/// Playback status shown on the OS surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Playing,
    Paused,
}

impl From<bool> for PlaybackStatus {
    fn from(is_playing: bool) -> Self {
        if is_playing {
            Self::Playing
        } else {
            Self::Paused
        }
    }
}

/// Text shown for the current track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
}

impl TrackMetadata {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            album: album.into(),
        }
    }
}

/// A live, registered now-playing session.
///
/// Shared between the caller's thread and the thumbnail worker, so
/// implementations synchronize internally. Playback status takes effect
/// immediately; metadata and art are staged until [`commit`].
///
/// [`commit`]: MediaSession::commit
pub trait MediaSession: Send + Sync {
    fn set_playback_status(&self, status: PlaybackStatus) -> Result<()>;

    /// Stage new track text and clear any previous art.
    fn set_metadata(&self, metadata: &TrackMetadata) -> Result<()>;

    /// Load cover art from a local file and stage it. May block on file I/O.
    ///
    /// `is_current` must be checked after the load, atomically with staging
    /// relative to [`set_metadata`](MediaSession::set_metadata). When it
    /// returns `false` the art belongs to an older track: nothing is staged
    /// and the call returns `Ok(false)`.
    fn set_thumbnail(&self, path: &Path, is_current: &dyn Fn() -> bool) -> Result<bool>;

    /// Publish staged values to the OS.
    fn commit(&self) -> Result<()>;

    /// Unregister the button listener and drop native handles.
    ///
    /// Calls after the first are no-ops.
    fn release(&self) -> Result<()>;
}

/// Creates native sessions.
pub trait MediaSessionProvider: Send {
    /// Acquire the session and register `on_button` for transport presses.
    fn acquire(&self, on_button: ButtonHandler) -> Result<Box<dyn MediaSession>>;
}

/// Provider for platforms without a media surface.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedProvider;

impl MediaSessionProvider for UnsupportedProvider {
    fn acquire(&self, _on_button: ButtonHandler) -> Result<Box<dyn MediaSession>> {
        Err(MediaControlError::Unsupported)
    }
}

/// Provider for the current OS.
pub fn host_provider() -> Box<dyn MediaSessionProvider> {
    #[cfg(windows)]
    {
        Box::new(crate::smtc::SmtcProvider)
    }
    #[cfg(not(windows))]
    {
        Box::new(UnsupportedProvider)
    }
}
