//! Error types for the Gut object store.

use crate::types::ObjectId;
use std::path::Path;
use thiserror::Error;

/// Storage-related errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    ObjectNotFound(ObjectId),

    #[error("Corrupt object {id}: {reason}")]
    CorruptObject { id: ObjectId, reason: String },

    #[error("Malformed tree entry at line {line}: {reason}")]
    MalformedTreeEntry { line: usize, reason: String },

    #[error("Invalid object id: {0:?}")]
    InvalidObjectId(String),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl StorageError {
    /// Wrap an I/O error with the action and path it failed on, keeping its kind.
    pub fn io(action: &str, path: &Path, err: std::io::Error) -> Self {
        StorageError::IoError(std::io::Error::new(
            err.kind(),
            format!("Failed to {} {:?}: {}", action, path, err),
        ))
    }

    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        StorageError::MalformedTreeEntry {
            line,
            reason: reason.into(),
        }
    }
}

/// Reasons a byte sequence is not a valid framed object
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("missing NUL separator after header")]
    MissingNul,

    #[error("malformed header: {0:?}")]
    MalformedHeader(String),

    #[error("unknown object kind: {0:?}")]
    UnknownKind(String),

    #[error("invalid size: {0:?}")]
    InvalidSize(String),

    #[error("declared size {declared} does not match payload length {actual}")]
    SizeMismatch { declared: usize, actual: usize },
}

/// Errors surfaced by the command layer
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
