//! Common error types for FairHire

use thiserror::Error;

/// Common result type for FairHire operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across FairHire crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Scoring service failure (transport error, timeout, or non-2xx)
    #[error("Upstream error: {message}")]
    Upstream {
        /// HTTP status from the scoring service, when one was received
        status: Option<u16>,
        message: String,
    },

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Build an upstream error from a transport failure (no status available)
    pub fn upstream_transport(message: impl Into<String>) -> Self {
        Error::Upstream {
            status: None,
            message: message.into(),
        }
    }
}
