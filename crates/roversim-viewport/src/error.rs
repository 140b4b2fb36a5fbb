//! Error types for the viewport link.

use thiserror::Error;

/// Errors from viewport communication.
#[derive(Error, Debug)]
pub enum ViewportError {
    /// Socket error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A reply did not decode as the expected JSON shape.
    #[error("invalid reply: {0}")]
    InvalidReply(#[from] serde_json::Error),

    /// The peer closed the connection.
    #[error("viewport peer disconnected")]
    Disconnected,
}

/// Result type for viewport operations.
pub type Result<T> = std::result::Result<T, ViewportError>;
