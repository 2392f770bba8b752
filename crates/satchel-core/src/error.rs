//! Error types for satchel-core

use thiserror::Error;

/// Result type alias using satchel-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in satchel-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// The durable store could not be opened or an operation against it failed
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Record not found
    #[error("record not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<libsql::Error> for Error {
    fn from(error: libsql::Error) -> Self {
        Self::StoreUnavailable(error.to_string())
    }
}
