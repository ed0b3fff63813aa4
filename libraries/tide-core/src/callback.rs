//! Externally supplied handler slots.

use std::sync::Arc;

/// A handler invoked from a platform thread.
///
/// Handlers run on whatever thread the OS delivers the event on (the media
/// event thread, the tray icon thread) and must not block. Hand work back to
/// the UI thread through a channel.
pub type Callback = Arc<dyn Fn() + Send + Sync>;

/// Wrap a closure as a [`Callback`].
pub fn callback<F>(f: F) -> Callback
where
    F: Fn() + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Invoke an optional handler slot.
pub fn invoke(slot: Option<&Callback>) {
    if let Some(handler) = slot {
        handler();
    }
}
