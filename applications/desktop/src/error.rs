/// Desktop host error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DesktopError>;

#[derive(Debug, Error)]
pub enum DesktopError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("System error: {0}")]
    System(#[from] tide_system::SystemError),
}

impl From<config::ConfigError> for DesktopError {
    fn from(err: config::ConfigError) -> Self {
        DesktopError::Config(err.to_string())
    }
}
