use thiserror::Error;

/// Errors from the tray icon
#[derive(Debug, Error)]
pub enum TrayError {
    /// Icon file could not be read or decoded
    #[error("Icon error: {0}")]
    Icon(String),

    /// Native tray API failed
    #[error("Native tray error: {0}")]
    Native(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for tray operations
pub type Result<T> = std::result::Result<T, TrayError>;
