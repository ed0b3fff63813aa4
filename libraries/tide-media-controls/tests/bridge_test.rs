//! Bridge behavior against a recording media session.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender};
use tide_core::MediaSessionState;
use tide_media_controls::{
    BridgeState, ButtonHandler, MediaButton, MediaCallbacks, MediaControlError, MediaSession,
    MediaSessionProvider, MediaSurfaceBridge, PlaybackStatus, Result, TrackMetadata,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Status(PlaybackStatus),
    Metadata(TrackMetadata),
    Thumbnail(PathBuf),
    Commit,
    Release,
}

type CallLog = Arc<Mutex<Vec<Call>>>;

/// Holds each thumbnail load until the test releases it.
struct Gate {
    entered: Sender<PathBuf>,
    release: Receiver<()>,
}

struct RecordingSession {
    calls: CallLog,
    gate: Option<Gate>,
    reject_metadata: Arc<AtomicBool>,
}

impl MediaSession for RecordingSession {
    fn set_playback_status(&self, status: PlaybackStatus) -> Result<()> {
        self.calls.lock().unwrap().push(Call::Status(status));
        Ok(())
    }

    fn set_metadata(&self, metadata: &TrackMetadata) -> Result<()> {
        if self.reject_metadata.load(Ordering::SeqCst) {
            return Err(MediaControlError::Native("updater busy".into()));
        }
        self.calls.lock().unwrap().push(Call::Metadata(metadata.clone()));
        Ok(())
    }

    fn set_thumbnail(&self, path: &Path, is_current: &dyn Fn() -> bool) -> Result<bool> {
        if let Some(gate) = &self.gate {
            gate.entered.send(path.to_path_buf()).unwrap();
            gate.release.recv().unwrap();
        }
        // Same lock as set_metadata, like the native session
        let mut calls = self.calls.lock().unwrap();
        if !is_current() {
            return Ok(false);
        }
        calls.push(Call::Thumbnail(path.to_path_buf()));
        Ok(true)
    }

    fn commit(&self) -> Result<()> {
        self.calls.lock().unwrap().push(Call::Commit);
        Ok(())
    }

    fn release(&self) -> Result<()> {
        self.calls.lock().unwrap().push(Call::Release);
        Ok(())
    }
}

#[derive(Default)]
struct RecordingProvider {
    calls: CallLog,
    handler: Arc<Mutex<Option<ButtonHandler>>>,
    gate: Mutex<Option<Gate>>,
    reject_metadata: Arc<AtomicBool>,
    refuse: bool,
}

impl RecordingProvider {
    fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }

    fn gated(gate: Gate) -> Self {
        Self {
            gate: Mutex::new(Some(gate)),
            ..Self::default()
        }
    }
}

impl MediaSessionProvider for RecordingProvider {
    fn acquire(&self, on_button: ButtonHandler) -> Result<Box<dyn MediaSession>> {
        if self.refuse {
            return Err(MediaControlError::Native("access denied".into()));
        }
        *self.handler.lock().unwrap() = Some(on_button);
        Ok(Box::new(RecordingSession {
            calls: self.calls.clone(),
            gate: self.gate.lock().unwrap().take(),
            reject_metadata: self.reject_metadata.clone(),
        }))
    }
}

fn wait_for(calls: &CallLog, done: impl Fn(&[Call]) -> bool) -> Vec<Call> {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let snapshot = calls.lock().unwrap().clone();
        if done(&snapshot) || Instant::now() > deadline {
            return snapshot;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
}

fn metadata(title: &str) -> Call {
    Call::Metadata(TrackMetadata::new(title, "Artist", "Album"))
}

#[test]
fn test_updates_before_initialize_are_ignored() {
    let provider = RecordingProvider::default();
    let calls = provider.calls.clone();
    let bridge = MediaSurfaceBridge::with_provider(MediaCallbacks::new(), Box::new(provider));

    bridge.update_metadata("Song", "Artist", "Album", None);
    bridge.update_playback_status(true);

    assert_eq!(bridge.state(), BridgeState::Uninitialized);
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn test_refused_session_stays_uninitialized() {
    let mut bridge =
        MediaSurfaceBridge::with_provider(MediaCallbacks::new(), Box::new(RecordingProvider::refusing()));

    assert!(!bridge.initialize());
    assert_eq!(bridge.state(), BridgeState::Uninitialized);

    // No-ops, no panic
    bridge.update_metadata("Song", "Artist", "Album", None);
    bridge.update_playback_status(false);
    bridge.shutdown();
}

#[test]
fn test_initialize_twice_acquires_once() {
    let provider = RecordingProvider::default();
    let handler = provider.handler.clone();
    let mut bridge = MediaSurfaceBridge::with_provider(MediaCallbacks::new(), Box::new(provider));

    assert!(bridge.initialize());
    let first = handler.lock().unwrap().clone().unwrap();
    assert!(bridge.initialize());
    let second = handler.lock().unwrap().clone().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_metadata_without_art_publishes_immediately() {
    let provider = RecordingProvider::default();
    let calls = provider.calls.clone();
    let mut bridge = MediaSurfaceBridge::with_provider(MediaCallbacks::new(), Box::new(provider));
    assert!(bridge.initialize());

    bridge.update_metadata("Song", "Artist", "Album", None);
    bridge.update_playback_status(true);

    assert_eq!(
        *calls.lock().unwrap(),
        vec![metadata("Song"), Call::Commit, Call::Status(PlaybackStatus::Playing)]
    );
}

#[test]
fn test_missing_art_file_publishes_text_only() {
    let provider = RecordingProvider::default();
    let calls = provider.calls.clone();
    let mut bridge = MediaSurfaceBridge::with_provider(MediaCallbacks::new(), Box::new(provider));
    assert!(bridge.initialize());

    bridge.update_metadata("Song", "Artist", "Album", Some(Path::new("/no/such/cover.jpg")));
    bridge.shutdown();

    let calls = calls.lock().unwrap().clone();
    assert_eq!(calls, vec![metadata("Song"), Call::Commit, Call::Release]);
}

#[test]
fn test_art_loads_in_background() {
    let dir = tempfile::tempdir().unwrap();
    let cover = dir.path().join("cover.jpg");
    std::fs::write(&cover, b"jpeg").unwrap();

    let provider = RecordingProvider::default();
    let calls = provider.calls.clone();
    let mut bridge = MediaSurfaceBridge::with_provider(MediaCallbacks::new(), Box::new(provider));
    assert!(bridge.initialize());

    bridge.update_metadata("Song", "Artist", "Album", Some(&cover));

    let calls = wait_for(&calls, |c| c.contains(&Call::Commit));
    assert_eq!(
        calls,
        vec![metadata("Song"), Call::Thumbnail(cover.clone()), Call::Commit]
    );
}

#[test]
fn test_stale_art_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let covers: Vec<PathBuf> = ["a.jpg", "b.jpg", "c.jpg"]
        .iter()
        .map(|name| {
            let path = dir.path().join(name);
            std::fs::write(&path, b"jpeg").unwrap();
            path
        })
        .collect();

    let (entered_tx, entered_rx) = unbounded();
    let (release_tx, release_rx) = unbounded();
    let provider = RecordingProvider::gated(Gate {
        entered: entered_tx,
        release: release_rx,
    });
    let calls = provider.calls.clone();
    let mut bridge = MediaSurfaceBridge::with_provider(MediaCallbacks::new(), Box::new(provider));
    assert!(bridge.initialize());

    // Worker is now busy loading A
    bridge.update_metadata("A", "Artist", "Album", Some(&covers[0]));
    assert_eq!(entered_rx.recv_timeout(Duration::from_secs(5)).unwrap(), covers[0]);

    bridge.update_metadata("B", "Artist", "Album", Some(&covers[1]));
    bridge.update_metadata("C", "Artist", "Album", Some(&covers[2]));

    release_tx.send(()).unwrap();
    assert_eq!(entered_rx.recv_timeout(Duration::from_secs(5)).unwrap(), covers[2]);
    release_tx.send(()).unwrap();

    let calls = wait_for(&calls, |c| c.last() == Some(&Call::Commit));
    assert_eq!(
        calls,
        vec![
            metadata("A"),
            metadata("B"),
            metadata("C"),
            Call::Thumbnail(covers[2].clone()),
            Call::Commit,
        ]
    );
}

struct GatedBridge {
    bridge: MediaSurfaceBridge,
    calls: CallLog,
    reject_metadata: Arc<AtomicBool>,
    entered: Receiver<PathBuf>,
    release: Sender<()>,
}

fn gated_bridge() -> GatedBridge {
    let (entered_tx, entered_rx) = unbounded();
    let (release_tx, release_rx) = unbounded();
    let provider = RecordingProvider::gated(Gate {
        entered: entered_tx,
        release: release_rx,
    });
    let calls = provider.calls.clone();
    let reject = provider.reject_metadata.clone();
    let mut bridge = MediaSurfaceBridge::with_provider(MediaCallbacks::new(), Box::new(provider));
    assert!(bridge.initialize());
    GatedBridge {
        bridge,
        calls,
        reject_metadata: reject,
        entered: entered_rx,
        release: release_tx,
    }
}

#[test]
fn test_art_loading_when_next_track_has_none_is_discarded() {
    let dir = tempfile::tempdir().unwrap();
    let cover = dir.path().join("a.jpg");
    std::fs::write(&cover, b"jpeg").unwrap();

    let GatedBridge {
        mut bridge,
        calls,
        entered,
        release,
        ..
    } = gated_bridge();

    bridge.update_metadata("A", "Artist", "Album", Some(&cover));
    assert_eq!(entered.recv_timeout(Duration::from_secs(5)).unwrap(), cover);

    // Next track has no cover and is published while A's art is still loading
    bridge.update_metadata("B", "Artist", "Album", None);
    release.send(()).unwrap();
    bridge.shutdown();

    assert_eq!(
        *calls.lock().unwrap(),
        vec![metadata("A"), metadata("B"), Call::Commit, Call::Release]
    );
}

#[test]
fn test_failed_metadata_still_cancels_pending_art() {
    let dir = tempfile::tempdir().unwrap();
    let cover = dir.path().join("a.jpg");
    std::fs::write(&cover, b"jpeg").unwrap();

    let GatedBridge {
        mut bridge,
        calls,
        reject_metadata: reject,
        entered,
        release,
    } = gated_bridge();

    bridge.update_metadata("A", "Artist", "Album", Some(&cover));
    assert_eq!(entered.recv_timeout(Duration::from_secs(5)).unwrap(), cover);

    reject.store(true, Ordering::SeqCst);
    bridge.update_metadata("B", "Artist", "Album", None);
    reject.store(false, Ordering::SeqCst);

    release.send(()).unwrap();
    bridge.shutdown();

    assert_eq!(*calls.lock().unwrap(), vec![metadata("A"), Call::Release]);
}

#[test]
fn test_buttons_reach_callbacks_in_order() {
    let pressed = Arc::new(Mutex::new(Vec::new()));
    let record = |name: &'static str| {
        let pressed = pressed.clone();
        move || pressed.lock().unwrap().push(name)
    };
    let callbacks = MediaCallbacks::new()
        .on_play(record("play"))
        .on_pause(record("pause"))
        .on_next(record("next"))
        .on_previous(record("previous"))
        .on_stop(record("stop"));

    let provider = RecordingProvider::default();
    let handler = provider.handler.clone();
    let mut bridge = MediaSurfaceBridge::with_provider(callbacks, Box::new(provider));
    assert!(bridge.initialize());

    let handler = handler.lock().unwrap().clone().unwrap();
    for button in [
        MediaButton::Next,
        MediaButton::Next,
        MediaButton::Pause,
        MediaButton::Previous,
        MediaButton::Play,
        MediaButton::Stop,
    ] {
        handler(button);
    }

    assert_eq!(
        *pressed.lock().unwrap(),
        vec!["next", "next", "pause", "previous", "play", "stop"]
    );
}

#[test]
fn test_shutdown_is_terminal_and_idempotent() {
    let provider = RecordingProvider::default();
    let calls = provider.calls.clone();
    let mut bridge = MediaSurfaceBridge::with_provider(MediaCallbacks::new(), Box::new(provider));
    assert!(bridge.initialize());

    bridge.shutdown();
    bridge.shutdown();
    assert_eq!(bridge.state(), BridgeState::ShutDown);

    bridge.update_metadata("Late", "Artist", "Album", None);
    bridge.update_playback_status(true);
    assert!(!bridge.initialize());
    drop(bridge);

    assert_eq!(*calls.lock().unwrap(), vec![Call::Release]);
}

#[test]
fn test_apply_snapshot() {
    let provider = RecordingProvider::default();
    let calls = provider.calls.clone();
    let mut bridge = MediaSurfaceBridge::with_provider(MediaCallbacks::new(), Box::new(provider));
    assert!(bridge.initialize());

    bridge.apply(&MediaSessionState::playing("Song", "Artist").with_album("Album").paused());
    bridge.update_position(Duration::from_secs(42));

    assert_eq!(
        *calls.lock().unwrap(),
        vec![metadata("Song"), Call::Commit, Call::Status(PlaybackStatus::Paused)]
    );
}
