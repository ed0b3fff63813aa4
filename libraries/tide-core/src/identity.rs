//! Application identity shared by every OS registration.

/// Reverse-DNS application id (AppUserModelID, secret schema, tray id).
pub const APP_ID: &str = "io.github.nokse22.high-tide";

/// Human readable application name.
pub const APP_NAME: &str = "High Tide";

/// Fixed identifier the credential bundle is stored under.
pub const CREDENTIAL_KEY: &str = "high-tide-login";

/// Value name used for the autostart registration.
pub const STARTUP_VALUE_NAME: &str = "HighTide";

/// URI scheme handled by the application.
pub const PROTOCOL_SCHEME: &str = "tidal";
