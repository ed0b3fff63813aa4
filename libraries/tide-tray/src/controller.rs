//! Tray icon lifecycle.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, unbounded, RecvTimeoutError, Sender};
use tide_core::callback::invoke;
use tide_core::Callback;
use tracing::{debug, info, warn};

use crate::host::{host_tray, EventSink, TrayEvent, TrayHost, TrayUpdate};
use crate::icon::load_icon;
use crate::menu::TrayMenuItem;
use crate::state::TrayState;

/// How long `start` waits for the icon to appear
const STARTUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Menu callbacks. They run on the icon thread.
#[derive(Clone, Default)]
pub struct TrayCallbacks {
    show: Option<Callback>,
    play_pause: Option<Callback>,
    next: Option<Callback>,
    previous: Option<Callback>,
    quit: Option<Callback>,
}

impl TrayCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_show(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.show = Some(tide_core::callback(f));
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

    /// Runs after the icon has been told to go away.
    #[must_use]
    pub fn on_quit(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.quit = Some(tide_core::callback(f));
        self
    }
}

impl std::fmt::Debug for TrayCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrayCallbacks")
            .field("show", &self.show.is_some())
            .field("play_pause", &self.play_pause.is_some())
            .field("next", &self.next.is_some())
            .field("previous", &self.previous.is_some())
            .field("quit", &self.quit.is_some())
            .finish()
    }
}

/// State shared with the icon thread.
struct Shared {
    state: Mutex<TrayState>,
    updates: Mutex<Option<Sender<TrayUpdate>>>,
    running: AtomicBool,
}

impl Shared {
    fn send(&self, update: TrayUpdate) {
        if let Ok(updates) = self.updates.lock() {
            if let Some(tx) = updates.as_ref() {
                if tx.send(update).is_err() {
                    debug!("Tray update dropped, icon loop gone");
                }
            }
        }
    }

    /// Ask the icon loop to exit. Safe from any thread, including the icon's.
    fn request_stop(&self) {
        let tx = match self.updates.lock() {
            Ok(mut updates) => updates.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(tx) = tx {
            if tx.send(TrayUpdate::Shutdown).is_err() {
                debug!("Tray icon loop already exited");
            }
        }
    }
}

/// Owns the tray icon thread.
///
/// ```no_run
/// use tide_tray::{TrayCallbacks, TrayController};
///
/// let mut tray = TrayController::new(TrayCallbacks::new().on_quit(|| std::process::exit(0)));
/// if tray.start(None) {
///     tray.update_state(true, "Teardrop", "Massive Attack");
/// }
/// tray.stop();
/// ```
pub struct TrayController {
    callbacks: Arc<TrayCallbacks>,
    host: Option<Arc<dyn TrayHost>>,
    shared: Arc<Shared>,
    thread: Option<JoinHandle<()>>,
}

impl TrayController {
    /// Controller backed by the host OS tray.
    pub fn new(callbacks: TrayCallbacks) -> Self {
        Self::build(callbacks, host_tray())
    }

    pub fn with_host(callbacks: TrayCallbacks, host: Arc<dyn TrayHost>) -> Self {
        Self::build(callbacks, Some(host))
    }

    /// Controller with no tray behind it; [`start`](Self::start) always
    /// returns `false`.
    pub fn detached(callbacks: TrayCallbacks) -> Self {
        Self::build(callbacks, None)
    }

    fn build(callbacks: TrayCallbacks, host: Option<Arc<dyn TrayHost>>) -> Self {
        Self {
            callbacks: Arc::new(callbacks),
            host,
            shared: Arc::new(Shared {
                state: Mutex::new(TrayState::idle()),
                updates: Mutex::new(None),
                running: AtomicBool::new(false),
            }),
            thread: None,
        }
    }

    /// Whether the icon loop is currently alive.
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Last derived tooltip and label.
    pub fn state(&self) -> TrayState {
        self.shared
            .state
            .lock()
            .map(|state| state.clone())
            .unwrap_or_default()
    }

    /// Show the icon, using the image at `icon_path` if it can be loaded.
    ///
    /// Blocks until the icon is visible. Returns `false` if there is no tray
    /// on this platform, the icon thread cannot be spawned, or the native
    /// host fails before showing the icon. A second call while running is a
    /// no-op.
    pub fn start(&mut self, icon_path: Option<&Path>) -> bool {
        if self.thread.is_some() {
            if self.is_running() {
                return true;
            }
            // Previous loop exited on its own (Quit or native failure)
            self.join();
        }

        let Some(host) = self.host.clone() else {
            debug!("No system tray on this platform");
            return false;
        };

        let icon = load_icon(icon_path);
        let state = self.state();

        let (tx, rx) = unbounded();
        if let Ok(mut updates) = self.shared.updates.lock() {
            *updates = Some(tx);
        }

        let events = self.event_sink();
        let shared = self.shared.clone();
        shared.running.store(true, Ordering::SeqCst);

        // One-shot: the host reports the icon is up, or the thread exits
        let (ready_tx, ready_rx) = bounded::<()>(1);

        let spawned = thread::Builder::new()
            .name("tray-icon".into())
            .spawn(move || {
                let on_ready = || {
                    // Only the first signal matters
                    ready_tx.try_send(()).ok();
                };
                if let Err(e) = host.run(icon, state, rx, events, &on_ready) {
                    warn!(error = %e, "Tray icon loop failed");
                }
                shared.running.store(false, Ordering::SeqCst);
                debug!("Tray icon loop exited");
            });

        match spawned {
            Ok(handle) => self.thread = Some(handle),
            Err(e) => {
                warn!(error = %e, "Failed to spawn tray thread");
                self.shared.running.store(false, Ordering::SeqCst);
                self.shared.request_stop();
                return false;
            }
        }

        match ready_rx.recv_timeout(STARTUP_TIMEOUT) {
            Ok(()) => {
                info!("Tray icon started");
                true
            }
            Err(RecvTimeoutError::Disconnected) => {
                warn!("Tray icon failed to appear");
                self.shared.request_stop();
                self.join();
                false
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(timeout = ?STARTUP_TIMEOUT, "Tray icon did not appear in time");
                self.shared.request_stop();
                false
            }
        }
    }

    fn event_sink(&self) -> EventSink {
        let callbacks = self.callbacks.clone();
        let shared = self.shared.clone();

        Arc::new(move |event| {
            debug!(?event, "Tray event");
            match event {
                TrayEvent::Activated | TrayEvent::Menu(TrayMenuItem::Show) => {
                    invoke(callbacks.show.as_ref());
                }
                TrayEvent::Menu(TrayMenuItem::PlayPause) => invoke(callbacks.play_pause.as_ref()),
                TrayEvent::Menu(TrayMenuItem::Next) => invoke(callbacks.next.as_ref()),
                TrayEvent::Menu(TrayMenuItem::Previous) => invoke(callbacks.previous.as_ref()),
                TrayEvent::Menu(TrayMenuItem::Quit) => {
                    shared.request_stop();
                    invoke(callbacks.quit.as_ref());
                }
            }
        })
    }

    /// Recompute the tooltip and play/pause label.
    ///
    /// Only a change is forwarded to the icon; repeating the same state does
    /// nothing.
    pub fn update_state(&self, is_playing: bool, title: &str, artist: &str) {
        let next = TrayState::derive(is_playing, title, artist);

        {
            let Ok(mut current) = self.shared.state.lock() else {
                return;
            };
            if *current == next {
                return;
            }
            current.clone_from(&next);
        }

        self.shared.send(TrayUpdate::State(next));
    }

    /// Remove the icon and wait for its thread. Does nothing if no icon is
    /// running.
    pub fn stop(&mut self) {
        self.shared.request_stop();
        self.join();
    }

    fn join(&mut self) {
        let Some(handle) = self.thread.take() else {
            return;
        };

        // Never join the icon thread from itself
        if handle.thread().id() == thread::current().id() {
            return;
        }
        if handle.join().is_err() {
            warn!("Tray thread panicked");
        }
        info!("Tray icon stopped");
    }
}

impl Drop for TrayController {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for TrayController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrayController")
            .field("callbacks", &self.callbacks)
            .field("has_host", &self.host.is_some())
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}
