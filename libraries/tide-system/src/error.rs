use thiserror::Error;

/// Errors from OS integration
#[derive(Debug, Error)]
pub enum SystemError {
    /// Feature has no implementation on this platform
    #[error("Unsupported on this platform")]
    Unsupported,

    /// Registry access failed
    #[error("Registry error: {0}")]
    Registry(#[from] std::io::Error),

    /// Could not work out how to relaunch this program
    #[error("Launch target error: {0}")]
    LaunchTarget(String),

    /// Toast could not be shown
    #[error("Notification error: {0}")]
    Notification(String),

    /// URI is not a recognised TIDAL link
    #[error("Invalid link: {0}")]
    InvalidLink(String),
}

/// Result type for system integration operations
pub type Result<T> = std::result::Result<T, SystemError>;
