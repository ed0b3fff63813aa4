/// Desktop host configuration
use crate::error::{DesktopError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tide_system::LaunchTarget;

/// Looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "tide.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DesktopConfig {
    #[serde(default = "default_credentials")]
    pub credentials: CredentialSettings,

    #[serde(default = "default_tray")]
    pub tray: TraySettings,

    #[serde(default = "default_media_controls")]
    pub media_controls: MediaControlSettings,

    #[serde(default = "default_notifications")]
    pub notifications: NotificationSettings,

    #[serde(default)]
    pub launch: LaunchSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CredentialSettings {
    /// Vault target name / keyring item label
    #[serde(default = "default_target")]
    pub target: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TraySettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// SVG or raster image; a placeholder is drawn when unset or unreadable
    #[serde(default)]
    pub icon_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaControlSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Pending cover-art loads before new ones are dropped
    #[serde(default = "default_thumbnail_queue")]
    pub thumbnail_queue: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// Relaunch through an interpreter instead of the running executable.
/// Both fields or neither.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LaunchSettings {
    #[serde(default)]
    pub interpreter: Option<PathBuf>,

    #[serde(default)]
    pub script: Option<PathBuf>,
}

impl DesktopConfig {
    /// Load configuration from file and environment
    ///
    /// `path` must exist when given; otherwise `tide.toml` is read if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables, e.g. TIDE_TRAY__ENABLED=false
        settings = settings.add_source(
            config::Environment::with_prefix("TIDE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.credentials.target.trim().is_empty() {
            return Err(DesktopError::Config(
                "credentials.target must not be empty".to_string(),
            ));
        }

        if self.media_controls.thumbnail_queue == 0 {
            return Err(DesktopError::Config(
                "media_controls.thumbnail_queue must be at least 1".to_string(),
            ));
        }

        if self.launch.interpreter.is_some() != self.launch.script.is_some() {
            return Err(DesktopError::Config(
                "launch.interpreter and launch.script must be set together".to_string(),
            ));
        }

        Ok(())
    }

    /// Command the OS should use to start this program.
    pub fn launch_target(&self) -> Result<LaunchTarget> {
        let target = match (&self.launch.interpreter, &self.launch.script) {
            (Some(interpreter), Some(script)) => {
                LaunchTarget::interpreted(interpreter.clone(), script)?
            }
            _ => LaunchTarget::current()?,
        };
        Ok(target)
    }
}

// Default values
fn default_credentials() -> CredentialSettings {
    CredentialSettings {
        target: default_target(),
    }
}

fn default_target() -> String {
    tide_core::CREDENTIAL_KEY.to_string()
}

fn default_tray() -> TraySettings {
    TraySettings {
        enabled: default_enabled(),
        icon_path: None,
    }
}

fn default_media_controls() -> MediaControlSettings {
    MediaControlSettings {
        enabled: default_enabled(),
        thumbnail_queue: default_thumbnail_queue(),
    }
}

fn default_thumbnail_queue() -> usize {
    tide_media_controls::DEFAULT_THUMBNAIL_QUEUE
}

fn default_notifications() -> NotificationSettings {
    NotificationSettings {
        enabled: default_enabled(),
    }
}

fn default_enabled() -> bool {
    true
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            credentials: default_credentials(),
            tray: default_tray(),
            media_controls: default_media_controls(),
            notifications: default_notifications(),
            launch: LaunchSettings::default(),
        }
    }
}
