//! Error types for Vostok

use thiserror::Error;

/// Result type alias using Vostok's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Vostok operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter (rejected before any oracle evaluation)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Export failed
    #[error("Export failed: {0}")]
    Export(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
