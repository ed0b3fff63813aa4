//! Tooltip and menu label derivation.

use tide_core::{MediaSessionState, APP_NAME};

/// Longest tooltip the Windows notification area accepts, in characters
pub const TOOLTIP_LIMIT: usize = 127;

/// What the icon shows for a given playback state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayState {
    pub tooltip: String,
    pub is_playing: bool,
}

impl TrayState {
    /// Derive the tooltip and play/pause label from player state.
    pub fn derive(is_playing: bool, title: &str, artist: &str) -> Self {
        let mut tooltip = String::from(APP_NAME);

        if !title.is_empty() {
            tooltip.push_str(" - ");
            tooltip.push_str(title);
            if !artist.is_empty() {
                tooltip.push_str(" by ");
                tooltip.push_str(artist);
            }
            if !is_playing {
                tooltip.push_str(" (Paused)");
            }
        }

        if tooltip.chars().count() > TOOLTIP_LIMIT {
            tooltip = tooltip.chars().take(TOOLTIP_LIMIT).collect();
        }

        Self {
            tooltip,
            is_playing,
        }
    }

    /// State before anything has played.
    pub fn idle() -> Self {
        Self::derive(false, "", "")
    }

    pub fn from_session(state: &MediaSessionState) -> Self {
        Self::derive(state.is_playing, &state.title, &state.artist)
    }

    pub fn play_pause_label(&self) -> &'static str {
        if self.is_playing {
            "Pause"
        } else {
            "Play"
        }
    }
}

impl Default for TrayState {
    fn default() -> Self {
        Self::idle()
    }
}
