//! Windows System Media Transport Controls session.
#![allow(unsafe_code)]

use std::future::IntoFuture;
use std::path::Path;
use std::sync::Mutex;

use futures::executor::block_on;
use tracing::{debug, warn};
use windows::core::{Result as WinResult, HSTRING};
use windows::Foundation::TypedEventHandler;
use windows::Media::Playback::MediaPlayer;
use windows::Media::{
    MediaPlaybackStatus, MediaPlaybackType, SystemMediaTransportControls,
    SystemMediaTransportControlsButtonPressedEventArgs, SystemMediaTransportControlsDisplayUpdater,
};
use windows::Storage::StorageFile;
use windows::Storage::Streams::RandomAccessStreamReference;
use windows::Win32::UI::Shell::SetCurrentProcessExplicitAppUserModelID;

use crate::button::MediaButton;
use crate::error::{MediaControlError, Result};
use crate::session::{
    ButtonHandler, MediaSession, MediaSessionProvider, PlaybackStatus, TrackMetadata,
};

impl From<windows::core::Error> for MediaControlError {
    fn from(err: windows::core::Error) -> Self {
        Self::Native(err.message())
    }
}

fn block_on_operation<O, T>(operation: O) -> WinResult<T>
where
    O: IntoFuture<Output = WinResult<T>>,
{
    block_on(operation.into_future())
}

/// Acquires the SMTC session through a background `MediaPlayer`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SmtcProvider;

impl MediaSessionProvider for SmtcProvider {
    fn acquire(&self, on_button: ButtonHandler) -> Result<Box<dyn MediaSession>> {
        // The shell groups the session under this identity; it must be set
        // before the player exists.
        // SAFETY: the HSTRING outlives the call and the API copies the string.
        if let Err(e) = unsafe {
            SetCurrentProcessExplicitAppUserModelID(&HSTRING::from(tide_core::APP_ID))
        } {
            warn!(error = %e.message(), "Failed to set AppUserModelID");
        }

        let player = MediaPlayer::new()?;
        let controls = player.SystemMediaTransportControls()?;

        controls.SetIsEnabled(true)?;
        controls.SetIsPlayEnabled(true)?;
        controls.SetIsPauseEnabled(true)?;
        controls.SetIsNextEnabled(true)?;
        controls.SetIsPreviousEnabled(true)?;
        controls.SetIsStopEnabled(true)?;

        let handler = TypedEventHandler::<
            SystemMediaTransportControls,
            SystemMediaTransportControlsButtonPressedEventArgs,
        >::new(move |_, args| {
            if let Some(args) = args.as_ref() {
                let code = args.Button()?.0;
                match MediaButton::from_smtc_code(code) {
                    Some(button) => on_button(button),
                    None => debug!(code, "Ignoring media button"),
                }
            }
            Ok(())
        });
        let token = controls.ButtonPressed(&handler)?;

        let updater = controls.DisplayUpdater()?;
        updater.SetType(MediaPlaybackType::Music)?;

        Ok(Box::new(SmtcSession {
            handles: Mutex::new(Some(Handles {
                _player: player,
                controls,
                updater,
                token,
            })),
        }))
    }
}

struct Handles {
    // Owns the controls; dropping it unregisters the session
    _player: MediaPlayer,
    controls: SystemMediaTransportControls,
    updater: SystemMediaTransportControlsDisplayUpdater,
    token: i64,
}

struct SmtcSession {
    handles: Mutex<Option<Handles>>,
}

impl SmtcSession {
    fn with_handles<T>(&self, f: impl FnOnce(&Handles) -> WinResult<T>) -> Result<T> {
        let guard = self
            .handles
            .lock()
            .map_err(|_| MediaControlError::Native("session lock poisoned".into()))?;
        let handles = guard.as_ref().ok_or(MediaControlError::Released)?;
        Ok(f(handles)?)
    }
}

impl MediaSession for SmtcSession {
    fn set_playback_status(&self, status: PlaybackStatus) -> Result<()> {
        let status = match status {
            PlaybackStatus::Playing => MediaPlaybackStatus::Playing,
            PlaybackStatus::Paused => MediaPlaybackStatus::Paused,
        };
        self.with_handles(|h| h.controls.SetPlaybackStatus(status))
    }

    fn set_metadata(&self, metadata: &TrackMetadata) -> Result<()> {
        self.with_handles(|h| {
            h.updater.ClearAll()?;
            h.updater.SetType(MediaPlaybackType::Music)?;

            let props = h.updater.MusicProperties()?;
            props.SetTitle(&HSTRING::from(metadata.title.as_str()))?;
            props.SetArtist(&HSTRING::from(metadata.artist.as_str()))?;
            props.SetAlbumTitle(&HSTRING::from(metadata.album.as_str()))
        })
    }

    fn set_thumbnail(&self, path: &Path, is_current: &dyn Fn() -> bool) -> Result<bool> {
        let path = std::path::absolute(path)
            .map_err(|e| MediaControlError::Thumbnail(e.to_string()))?;
        let path = HSTRING::from(path.to_string_lossy().as_ref());

        // Resolve outside the lock so status updates are never held up by I/O
        let file = block_on_operation(StorageFile::GetFileFromPathAsync(&path)?)
            .map_err(|e| MediaControlError::Thumbnail(e.message()))?;
        let stream = RandomAccessStreamReference::CreateFromFile(&file)?;

        // Checked under the session lock so a newer track's ClearAll cannot
        // slip in between the check and the staging
        self.with_handles(|h| {
            if !is_current() {
                return Ok(false);
            }
            h.updater.SetThumbnail(&stream)?;
            Ok(true)
        })
    }

    fn commit(&self) -> Result<()> {
        self.with_handles(|h| h.updater.Update())
    }

    fn release(&self) -> Result<()> {
        let handles = match self.handles.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        let Some(handles) = handles else {
            return Ok(());
        };

        handles.controls.RemoveButtonPressed(handles.token)?;
        handles.controls.SetIsEnabled(false)?;
        Ok(())
    }
}
