//! Error types for showrun-engine
//!
//! Configuration and parse failures arrive wrapped from showrun-common.

use thiserror::Error;

/// Main error type for showrun-engine
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP server errors
    #[error("HTTP server error: {0}")]
    Http(String),

    /// Rejected command or argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The engine actor is gone or did not answer
    #[error("Engine unavailable: {0}")]
    EngineUnavailable(String),

    /// OSC or HTTP integration setup errors
    #[error("Integration error: {0}")]
    Integration(String),

    /// Errors from the shared library
    #[error(transparent)]
    Common(#[from] showrun_common::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using showrun-engine Error
pub type Result<T> = std::result::Result<T, Error>;
