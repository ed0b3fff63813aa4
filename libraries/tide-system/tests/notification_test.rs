//! Notification de-duplication and dispatch.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use tide_system::{NotificationService, Result, SystemError, Toast, Toaster};

struct ChannelToaster {
    shown: Sender<Toast>,
    fail: bool,
}

impl Toaster for ChannelToaster {
    fn show(&self, toast: &Toast) -> Result<()> {
        self.shown.send(toast.clone()).unwrap();
        if self.fail {
            return Err(SystemError::Notification("toast rejected".into()));
        }
        Ok(())
    }
}

fn service(fail: bool) -> (NotificationService, Receiver<Toast>) {
    let (tx, rx) = unbounded();
    let toaster = Arc::new(ChannelToaster { shown: tx, fail });
    (NotificationService::with_toaster(Some(toaster)), rx)
}

fn drain(rx: &Receiver<Toast>, expected: usize) -> Vec<Toast> {
    let mut toasts = Vec::new();
    for _ in 0..expected {
        toasts.push(rx.recv_timeout(Duration::from_secs(5)).unwrap());
    }
    // Nothing beyond what was expected
    assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    toasts
}

#[test]
fn test_same_track_is_announced_once() {
    let (mut notifications, rx) = service(false);

    assert!(notifications.show_now_playing("One", "Artist", "Album", None, Some("t1")));
    assert!(!notifications.show_now_playing("One", "Artist", "Album", None, Some("t1")));
    assert!(notifications.show_now_playing("Two", "Artist", "Album", None, Some("t2")));

    let titles: Vec<String> = drain(&rx, 2).into_iter().map(|t| t.title).collect();
    assert_eq!(titles.len(), 2);
    assert!(titles.contains(&"One".to_string()));
    assert!(titles.contains(&"Two".to_string()));
}

#[test]
fn test_returning_to_earlier_track_is_announced() {
    let (mut notifications, rx) = service(false);

    assert!(notifications.show_now_playing("One", "A", "", None, Some("t1")));
    assert!(notifications.show_now_playing("Two", "A", "", None, Some("t2")));
    assert!(notifications.show_now_playing("One", "A", "", None, Some("t1")));
    drain(&rx, 3);
}

#[test]
fn test_missing_track_id_is_never_deduplicated() {
    let (mut notifications, rx) = service(false);

    assert!(notifications.show_now_playing("Radio", "A", "", None, None));
    assert!(notifications.show_now_playing("Radio", "A", "", None, None));
    drain(&rx, 2);
}

#[test]
fn test_message_format() {
    let (mut notifications, rx) = service(false);

    notifications.show_now_playing("One", "Artist", "Album", None, Some("t1"));
    assert_eq!(drain(&rx, 1)[0].message, "Artist • Album");

    notifications.show_now_playing("Two", "Artist", "", None, Some("t2"));
    assert_eq!(drain(&rx, 1)[0].message, "Artist");
}

#[test]
fn test_icon_only_when_file_exists() {
    let (mut notifications, rx) = service(false);
    let existing = std::env::current_exe().unwrap();

    notifications.show_now_playing("One", "A", "", Some(Path::new("/no/cover.png")), Some("t1"));
    assert_eq!(drain(&rx, 1)[0].icon, None);

    notifications.show_now_playing("Two", "A", "", Some(&existing), Some("t2"));
    assert_eq!(drain(&rx, 1)[0].icon.as_deref(), Some(existing.as_path()));
}

#[test]
fn test_disabled_shows_nothing() {
    let (mut notifications, rx) = service(false);
    notifications.set_enabled(false);

    assert!(!notifications.show_now_playing("One", "A", "", None, Some("t1")));
    assert!(!notifications.show_message("Hello", "World", None));
    drain(&rx, 0);

    notifications.set_enabled(true);
    assert!(notifications.show_now_playing("One", "A", "", None, Some("t1")));
    drain(&rx, 1);
}

#[test]
fn test_show_message_bypasses_dedupe() {
    let (mut notifications, rx) = service(false);

    notifications.show_now_playing("One", "A", "", None, Some("t1"));
    assert!(notifications.show_message("Logged in", "Welcome back", None));
    assert!(notifications.show_message("Logged in", "Welcome back", None));

    assert_eq!(drain(&rx, 3).len(), 3);
    // Message toasts do not reset track memory
    assert!(!notifications.show_now_playing("One", "A", "", None, Some("t1")));
}

#[test]
fn test_toaster_failure_is_contained() {
    let (mut notifications, rx) = service(true);

    assert!(notifications.show_now_playing("One", "A", "", None, Some("t1")));
    drain(&rx, 1);
}

#[test]
fn test_no_toaster_is_unavailable() {
    let mut notifications = NotificationService::with_toaster(None);

    assert!(!notifications.is_available());
    assert!(!notifications.show_now_playing("One", "A", "", None, Some("t1")));
    assert!(!notifications.show_message("Hello", "World", None));
}
