//! The media surface bridge.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tide_core::MediaSessionState;
use tracing::{debug, info, warn};

use crate::callbacks::MediaCallbacks;
use crate::error::MediaControlError;
use crate::session::{
    host_provider, ButtonHandler, MediaSessionProvider, PlaybackStatus, TrackMetadata,
};
use crate::thumbnail::{SharedSession, ThumbnailWorker};

/// Default bound on queued cover-art loads
pub const DEFAULT_THUMBNAIL_QUEUE: usize = 4;

/// Bridge lifecycle. `ShutDown` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    Uninitialized,
    Initialized,
    ShutDown,
}

/// Publishes player state to the OS media surface and routes button presses
/// back to [`MediaCallbacks`].
///
/// Every update is a no-op unless the bridge is initialized, and failures in
/// the native layer are logged rather than returned.
pub struct MediaSurfaceBridge {
    callbacks: Arc<MediaCallbacks>,
    provider: Box<dyn MediaSessionProvider>,
    session: Option<SharedSession>,
    thumbnails: Option<ThumbnailWorker>,
    state: BridgeState,
    queue_capacity: usize,
}

impl MediaSurfaceBridge {
    /// Bridge for the host platform's media surface.
    pub fn new(callbacks: MediaCallbacks) -> Self {
        Self::with_provider(callbacks, host_provider())
    }

    pub fn with_provider(callbacks: MediaCallbacks, provider: Box<dyn MediaSessionProvider>) -> Self {
        Self {
            callbacks: Arc::new(callbacks),
            provider,
            session: None,
            thumbnails: None,
            state: BridgeState::Uninitialized,
            queue_capacity: DEFAULT_THUMBNAIL_QUEUE,
        }
    }

    /// Bound on pending cover-art loads. Takes effect at [`initialize`].
    ///
    /// [`initialize`]: Self::initialize
    #[must_use]
    pub fn with_thumbnail_queue(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state == BridgeState::Initialized
    }

    /// Acquire the native session and enable play, pause, next, previous and
    /// stop.
    ///
    /// Returns `false` and stays uninitialized if the platform refuses.
    /// Returns `true` without re-registering if already initialized.
    pub fn initialize(&mut self) -> bool {
        match self.state {
            BridgeState::Initialized => return true,
            BridgeState::ShutDown => {
                debug!("Media bridge already shut down");
                return false;
            }
            BridgeState::Uninitialized => {}
        }

        let callbacks = self.callbacks.clone();
        let on_button: ButtonHandler = Arc::new(move |button| callbacks.dispatch(button));

        let session: SharedSession = match self.provider.acquire(on_button) {
            Ok(session) => Arc::from(session),
            Err(MediaControlError::Unsupported) => {
                debug!("No media surface on this platform");
                return false;
            }
            Err(e) => {
                warn!(error = %e, "Failed to initialize media controls");
                return false;
            }
        };

        self.thumbnails = match ThumbnailWorker::spawn(session.clone(), self.queue_capacity) {
            Ok(worker) => Some(worker),
            Err(e) => {
                warn!(error = %e, "Thumbnail worker unavailable, cover art disabled");
                None
            }
        };
        self.session = Some(session);
        self.state = BridgeState::Initialized;

        info!("Media controls initialized");
        true
    }

    /// Show the session as playing or paused.
    pub fn update_playback_status(&self, is_playing: bool) {
        let Some(session) = &self.session else {
            return;
        };

        if let Err(e) = session.set_playback_status(PlaybackStatus::from(is_playing)) {
            warn!(error = %e, "Failed to update playback status");
        }
    }

    /// Publish track text, and cover art when `thumbnail` names an existing
    /// file.
    ///
    /// Text is published right away when there is no art to load; otherwise
    /// it goes out together with the art once the worker has loaded it.
    pub fn update_metadata(&self, title: &str, artist: &str, album: &str, thumbnail: Option<&Path>) {
        let Some(session) = &self.session else {
            return;
        };

        // Art still loading for the previous track must not land on this one
        if let Some(worker) = &self.thumbnails {
            worker.supersede();
        }

        if let Err(e) = session.set_metadata(&TrackMetadata::new(title, artist, album)) {
            warn!(error = %e, "Failed to update media metadata");
            return;
        }

        let queued = match (thumbnail.filter(|path| path.is_file()), &self.thumbnails) {
            (Some(path), Some(worker)) => worker.submit(path.to_path_buf()),
            _ => false,
        };

        if !queued {
            if let Err(e) = session.commit() {
                warn!(error = %e, "Failed to publish media metadata");
            }
        }
    }

    /// Accepted for API completeness; the session does not publish a
    /// timeline, so the position is ignored.
    pub fn update_position(&self, _position: Duration) {}

    /// Publish a whole player snapshot.
    pub fn apply(&self, state: &MediaSessionState) {
        self.update_metadata(
            &state.title,
            &state.artist,
            &state.album,
            state.thumbnail_path.as_deref(),
        );
        self.update_playback_status(state.is_playing);
    }

    /// Release the native session and stop the thumbnail worker.
    ///
    /// Idempotent. After this the bridge ignores every update and cannot be
    /// initialized again.
    pub fn shutdown(&mut self) {
        if self.state == BridgeState::ShutDown {
            return;
        }
        self.state = BridgeState::ShutDown;

        let session = self.session.take();
        if let Some(mut worker) = self.thumbnails.take() {
            worker.shutdown();
        }

        if let Some(session) = session {
            if let Err(e) = session.release() {
                warn!(error = %e, "Failed to release media session");
            }
            info!("Media controls shut down");
        }
    }
}

impl Drop for MediaSurfaceBridge {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for MediaSurfaceBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaSurfaceBridge")
            .field("state", &self.state)
            .field("queue_capacity", &self.queue_capacity)
            .finish_non_exhaustive()
    }
}
