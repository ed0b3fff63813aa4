//! Media button translation.

/// Transport buttons forwarded to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaButton {
    Play,
    Pause,
    /// Toggle, for surfaces that send a single play/pause key
    PlayPause,
    Next,
    Previous,
    Stop,
}

impl MediaButton {
    /// Translate a `SystemMediaTransportControlsButton` value.
    ///
    /// Record, fast-forward, rewind and channel buttons are never enabled on
    /// the session and map to `None`.
    pub fn from_smtc_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Play),
            1 => Some(Self::Pause),
            2 => Some(Self::Stop),
            6 => Some(Self::Next),
            7 => Some(Self::Previous),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::PlayPause => "play_pause",
            Self::Next => "next",
            Self::Previous => "previous",
            Self::Stop => "stop",
        }
    }
}
