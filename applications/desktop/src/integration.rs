//! Root composition object for the platform layer.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use tide_core::MediaSessionState;
use tide_media_controls::{
    host_provider, MediaCallbacks, MediaSessionProvider, MediaSurfaceBridge,
};
use tide_secrets::{host_backend, CredentialStore, SecretBackend, SessionTokens};
use tide_system::{
    host_registry, host_toaster, NotificationService, ProtocolRegistrar, RegistryStore,
    StartupRegistrar, Toaster,
};
use tide_tray::{host_tray, TrayCallbacks, TrayController, TrayHost};
use tracing::{debug, info};

use crate::config::DesktopConfig;
use crate::error::Result;

/// Requests from OS surfaces (media keys, tray menu) for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    Play,
    Pause,
    PlayPause,
    Next,
    Previous,
    Stop,
    ShowWindow,
    Quit,
}

/// Native backends the integration is assembled from.
pub struct Platform {
    pub secrets: Box<dyn SecretBackend>,
    pub media: Box<dyn MediaSessionProvider>,
    pub tray: Option<Arc<dyn TrayHost>>,
    pub toaster: Option<Arc<dyn Toaster>>,
    pub registry: Arc<dyn RegistryStore>,
}

impl Platform {
    /// Backends for the current OS.
    pub fn host(config: &DesktopConfig) -> Self {
        Self {
            secrets: host_backend(&config.credentials.target),
            media: host_provider(),
            tray: host_tray(),
            toaster: host_toaster(),
            registry: host_registry(),
        }
    }
}

/// Owns every platform component for the life of the window.
///
/// Media keys and tray clicks arrive on OS threads and are forwarded as
/// [`PlayerCommand`]s on [`commands`](Self::commands); the player drains that
/// channel on its own thread.
pub struct PlatformIntegration {
    config: DesktopConfig,
    credentials: CredentialStore,
    media: MediaSurfaceBridge,
    tray: TrayController,
    notifications: NotificationService,
    startup: StartupRegistrar,
    protocol: ProtocolRegistrar,
    commands: Receiver<PlayerCommand>,
    last_state: Option<MediaSessionState>,
    /// Whether the track in `last_state` has had its "now playing" toast
    announced: bool,
    active: bool,
}

impl PlatformIntegration {
    /// Assemble on the host OS. Loads stored credentials synchronously.
    pub fn new(config: DesktopConfig, session: Arc<dyn SessionTokens>) -> Result<Self> {
        let platform = Platform::host(&config);
        Self::with_platform(config, session, platform)
    }

    pub fn with_platform(
        config: DesktopConfig,
        session: Arc<dyn SessionTokens>,
        platform: Platform,
    ) -> Result<Self> {
        config.validate()?;
        let target = config.launch_target()?;

        let (tx, rx) = unbounded();

        let credentials = CredentialStore::with_backend(session, platform.secrets);

        let media = MediaSurfaceBridge::with_provider(media_callbacks(&tx), platform.media)
            .with_thumbnail_queue(config.media_controls.thumbnail_queue);

        let tray = match platform.tray {
            Some(host) => TrayController::with_host(tray_callbacks(&tx), host),
            None => TrayController::detached(tray_callbacks(&tx)),
        };

        let mut notifications = NotificationService::with_toaster(platform.toaster);
        notifications.set_enabled(config.notifications.enabled);

        let startup = StartupRegistrar::with_registry(platform.registry.clone(), target.clone());
        let protocol = ProtocolRegistrar::with_registry(platform.registry, target);

        Ok(Self {
            config,
            credentials,
            media,
            tray,
            notifications,
            startup,
            protocol,
            commands: rx,
            last_state: None,
            announced: false,
            active: false,
        })
    }

    /// Bring up the OS surfaces enabled in configuration.
    ///
    /// Each surface degrades independently; a missing tray does not stop the
    /// media bridge and vice versa.
    pub fn activate(&mut self) {
        if self.active {
            return;
        }
        self.active = true;

        let media = self.config.media_controls.enabled && self.media.initialize();
        let tray = self.config.tray.enabled
            && self.tray.start(self.config.tray.icon_path.as_deref());

        info!(media, tray, "Platform integration active");
    }

    /// Push a player snapshot to every surface.
    ///
    /// Track text and art are republished when they change (a new track, or
    /// cover art that arrived after playback started); a play/pause toggle
    /// only updates the status. A "now playing" toast goes out the first time
    /// a track is seen playing, even if it was loaded paused.
    pub fn on_playback_changed(&mut self, state: &MediaSessionState) {
        let (new_track, new_display) = match &self.last_state {
            Some(last) => (!last.same_track(state), !last.same_display(state)),
            None => (true, true),
        };
        if new_track {
            self.announced = false;
        }

        if new_display {
            self.media.apply(state);
        } else {
            self.media.update_playback_status(state.is_playing);
        }

        self.tray
            .update_state(state.is_playing, &state.title, &state.artist);

        if !self.announced && state.is_playing && state.has_track() {
            self.announced = true;
            self.notifications.show_now_playing(
                &state.title,
                &state.artist,
                &state.album,
                state.thumbnail_path.as_deref(),
                state.track_id.as_deref(),
            );
        }

        self.last_state = Some(state.clone());
    }

    /// Forwarded to the media bridge, which does not publish a timeline.
    pub fn on_position_changed(&self, position: Duration) {
        self.media.update_position(position);
    }

    /// Persist the live session's tokens after a successful login.
    pub fn on_login(&mut self) -> bool {
        self.credentials.save()
    }

    pub fn on_logout(&mut self) {
        self.credentials.clear();
    }

    pub fn commands(&self) -> &Receiver<PlayerCommand> {
        &self.commands
    }

    pub fn config(&self) -> &DesktopConfig {
        &self.config
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn media(&self) -> &MediaSurfaceBridge {
        &self.media
    }

    pub fn tray(&self) -> &TrayController {
        &self.tray
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationService {
        &mut self.notifications
    }

    pub fn startup(&self) -> &StartupRegistrar {
        &self.startup
    }

    pub fn protocol(&self) -> &ProtocolRegistrar {
        &self.protocol
    }

    /// Remove the tray icon and release the media session. Idempotent.
    pub fn shutdown(&mut self) {
        self.tray.stop();
        self.media.shutdown();
        if self.active {
            self.active = false;
            info!("Platform integration shut down");
        }
    }
}

impl Drop for PlatformIntegration {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for PlatformIntegration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformIntegration")
            .field("credentials", &self.credentials)
            .field("media", &self.media)
            .field("tray", &self.tray)
            .field("notifications", &self.notifications)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

fn forward(tx: &Sender<PlayerCommand>, command: PlayerCommand) -> impl Fn() + Send + Sync + 'static {
    let tx = tx.clone();
    move || {
        if tx.send(command).is_err() {
            debug!(?command, "Player command dropped, integration gone");
        }
    }
}

fn media_callbacks(tx: &Sender<PlayerCommand>) -> MediaCallbacks {
    MediaCallbacks::new()
        .on_play(forward(tx, PlayerCommand::Play))
        .on_pause(forward(tx, PlayerCommand::Pause))
        .on_play_pause(forward(tx, PlayerCommand::PlayPause))
        .on_next(forward(tx, PlayerCommand::Next))
        .on_previous(forward(tx, PlayerCommand::Previous))
        .on_stop(forward(tx, PlayerCommand::Stop))
}

fn tray_callbacks(tx: &Sender<PlayerCommand>) -> TrayCallbacks {
    TrayCallbacks::new()
        .on_show(forward(tx, PlayerCommand::ShowWindow))
        .on_play_pause(forward(tx, PlayerCommand::PlayPause))
        .on_next(forward(tx, PlayerCommand::Next))
        .on_previous(forward(tx, PlayerCommand::Previous))
        .on_quit(forward(tx, PlayerCommand::Quit))
}
