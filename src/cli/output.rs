//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, StorageError};

/// Map domain errors to the line printed on stderr.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::StorageError(StorageError::ObjectNotFound(id)) => {
            format!("Error: object {} not found", id)
        }
        ApiError::StorageError(StorageError::InvalidObjectId(text)) => format!(
            "Error: {:?} is not a valid object hash (expected 64 lowercase hex characters)",
            text
        ),
        other => format!("Error: {}", other),
    }
}
