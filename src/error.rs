//! Error types for parley.

use thiserror::Error;

/// Common error type for parley.
#[derive(Error, Debug)]
pub enum ParleyError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid listen address.
    #[error("invalid listen address: {0}")]
    Addr(String),
}

/// Result type alias for parley operations.
pub type Result<T> = std::result::Result<T, ParleyError>;
