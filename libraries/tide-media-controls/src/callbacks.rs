//! Handler slots for media buttons.

use tide_core::callback::invoke;
use tide_core::Callback;
use tracing::debug;

use crate::button::MediaButton;

/// Player callbacks, one optional slot per button.
#[derive(Clone, Default)]
pub struct MediaCallbacks {
    play: Option<Callback>,
    pause: Option<Callback>,
    play_pause: Option<Callback>,
    next: Option<Callback>,
    previous: Option<Callback>,
    stop: Option<Callback>,
}

impl MediaCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_play(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.play = Some(tide_core::callback(f));
        self
    }

    #[must_use]
    pub fn on_pause(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.pause = Some(tide_core::callback(f));
        self
    }

    #[must_use]
    pub fn on_play_pause(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.play_pause = Some(tide_core::callback(f));
        self
    }

    #[must_use]
    pub fn on_next(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.next = Some(tide_core::callback(f));
        self
    }

    #[must_use]
    pub fn on_previous(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.previous = Some(tide_core::callback(f));
        self
    }

    #[must_use]
    pub fn on_stop(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.stop = Some(tide_core::callback(f));
        self
    }

    /// Run the handler for `button` on the calling thread.
    pub fn dispatch(&self, button: MediaButton) {
        debug!(button = button.name(), "Media button pressed");

        let slot = match button {
            MediaButton::Play => self.play.as_ref(),
            MediaButton::Pause => self.pause.as_ref(),
            MediaButton::PlayPause => self.play_pause.as_ref(),
            MediaButton::Next => self.next.as_ref(),
            MediaButton::Previous => self.previous.as_ref(),
            MediaButton::Stop => self.stop.as_ref(),
        };
        invoke(slot);
    }
}

impl std::fmt::Debug for MediaCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaCallbacks")
            .field("play", &self.play.is_some())
            .field("pause", &self.pause.is_some())
            .field("play_pause", &self.play_pause.is_some())
            .field("next", &self.next.is_some())
            .field("previous", &self.previous.is_some())
            .field("stop", &self.stop.is_some())
            .finish()
    }
}
