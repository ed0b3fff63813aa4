//! Media session state pushed by the player layer.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Snapshot of what is playing.
///
/// Eventually consistent with the audio engine: the player layer pushes a new
/// snapshot on every playback or track change and nothing here reads back
/// from the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSessionState {
    /// Whether audio is currently playing
    pub is_playing: bool,
    /// Track title (empty when nothing is loaded)
    pub title: String,
    /// Track artist
    pub artist: String,
    /// Album title
    pub album: String,
    /// Local path of the cover art, if one is cached
    pub thumbnail_path: Option<PathBuf>,
    /// Streaming-service track id, used to de-duplicate notifications
    pub track_id: Option<String>,
}

impl MediaSessionState {
    /// A playing state with title and artist.
    pub fn playing(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            is_playing: true,
            title: title.into(),
            artist: artist.into(),
            ..Self::default()
        }
    }

    /// Set the album title.
    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }

    /// Set the cover art path.
    #[must_use]
    pub fn with_thumbnail(mut self, path: impl Into<PathBuf>) -> Self {
        self.thumbnail_path = Some(path.into());
        self
    }

    /// Set the track id.
    #[must_use]
    pub fn with_track_id(mut self, id: impl Into<String>) -> Self {
        self.track_id = Some(id.into());
        self
    }

    /// Same snapshot with a different play/pause flag.
    #[must_use]
    pub fn paused(mut self) -> Self {
        self.is_playing = false;
        self
    }

    /// Whether a track is loaded at all.
    pub fn has_track(&self) -> bool {
        !self.title.is_empty()
    }

    /// Whether `other` describes the same track (ignoring play state).
    pub fn same_track(&self, other: &Self) -> bool {
        match (&self.track_id, &other.track_id) {
            (Some(a), Some(b)) => a == b,
            _ => self.title == other.title && self.artist == other.artist && self.album == other.album,
        }
    }

    /// Whether the now-playing surface would show the same text and art.
    pub fn same_display(&self, other: &Self) -> bool {
        self.title == other.title
            && self.artist == other.artist
            && self.album == other.album
            && self.thumbnail_path == other.thumbnail_path
    }
}
