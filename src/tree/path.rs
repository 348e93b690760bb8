//! Path resolution for snapshot roots

use crate::error::StorageError;
use std::path::{Path, PathBuf};

/// Resolve a snapshot root to an absolute, canonical path
///
/// Uses dunce so Windows paths come back without the `\\?\` prefix.
pub fn canonicalize_path(path: &Path) -> Result<PathBuf, StorageError> {
    dunce::canonicalize(path).map_err(|e| StorageError::io("resolve path", path, e))
}
