//! Common error types for rill

use thiserror::Error;

/// Common result type for rill operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the rill crates
#[derive(Error, Debug)]
pub enum Error {
    /// Payload could not be serialized or deserialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Message transport operation failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
