//! Centralized error types for letterdesk.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the letterdesk library.
#[derive(Error, Debug)]
pub enum LetterError {
    /// I/O error with the associated file path.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The letters file does not exist.
    #[error("Letters file not found: {0}")]
    FileNotFound(PathBuf),

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("Could not reach the letters endpoint: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status.
    #[error("The letters endpoint answered {code}: {message}")]
    Status { code: u16, message: String },

    /// The payload parsed as JSON but has the wrong shape.
    #[error("Unexpected letters payload: {0}")]
    Shape(String),

    /// The payload is not valid JSON.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value could not be interpreted.
    #[error("Invalid configuration value for '{key}': {reason}")]
    Config { key: String, reason: String },

    /// The occlusion surface refused to export a mask snapshot.
    #[error("Mask snapshot unavailable: {0}")]
    Snapshot(String),

    /// The audio player could not be started.
    #[error("Playback failed: {0}")]
    Playback(String),
}

/// Convenience alias for `Result<T, LetterError>`.
pub type Result<T> = std::result::Result<T, LetterError>;

impl LetterError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
