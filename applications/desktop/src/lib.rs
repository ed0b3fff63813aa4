//! High Tide Desktop Integration
//!
//! Composition root for the platform layer: one [`PlatformIntegration`] owns
//! the credential store, media bridge, tray, notifications and registrars,
//! and turns OS input into [`PlayerCommand`]s for the player to consume.
//!
//! This library exposes the pieces for testing; `main.rs` is a thin CLI.

pub mod config;
pub mod error;
pub mod integration;

pub use config::DesktopConfig;
pub use error::{DesktopError, Result};
pub use integration::{Platform, PlatformIntegration, PlayerCommand};
