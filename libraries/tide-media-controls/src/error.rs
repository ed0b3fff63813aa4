use thiserror::Error;

/// Errors from the native media session
#[derive(Debug, Error)]
pub enum MediaControlError {
    /// No media surface on this platform
    #[error("Media controls unsupported on this platform")]
    Unsupported,

    /// Session was used after release
    #[error("Media session already released")]
    Released,

    /// Native API call failed
    #[error("Native media API error: {0}")]
    Native(String),

    /// Thumbnail could not be turned into a native stream
    #[error("Thumbnail error: {0}")]
    Thumbnail(String),

    /// Worker thread could not be started
    #[error("Failed to start worker: {0}")]
    Worker(#[from] std::io::Error),
}

/// Result type for media control operations
pub type Result<T> = std::result::Result<T, MediaControlError>;
