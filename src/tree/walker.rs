//! Filesystem walker producing entries in post-order

use crate::error::StorageError;
use crate::store::DEFAULT_STORE_DIR;
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// What a walked entry is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file; `executable` is true when any execute bit is set
    File { executable: bool },
    /// A directory, emitted after all of its descendants
    Directory,
}

/// One filesystem entry below (or at) the walk root
#[derive(Debug, Clone)]
pub struct Entry {
    pub path: PathBuf,
    /// Final path segment; for the root this is informational only
    pub name: String,
    /// 0 for the walk root, 1 for its children, and so on
    pub depth: usize,
    pub kind: EntryKind,
}

/// Filesystem walker configuration
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Entry names excluded from the walk, along with everything beneath them
    pub ignore_names: Vec<String>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            ignore_names: vec![DEFAULT_STORE_DIR.to_string()],
        }
    }
}

/// Filesystem walker
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given root path
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            config: WalkerConfig::default(),
        }
    }

    /// Create a walker with custom configuration
    pub fn with_config(root: PathBuf, config: WalkerConfig) -> Self {
        Self { root, config }
    }

    /// Walk the filesystem and collect all entries
    ///
    /// Entries come back in post-order: every directory appears after all of
    /// its descendants, and the root directory is always last. Siblings are
    /// visited in file-name order. Symbolic links and special files abort the
    /// walk.
    pub fn walk(&self) -> Result<Vec<Entry>, StorageError> {
        let mut entries = Vec::new();
        // Directories whose subtree is still being visited, deepest last
        let mut open: Vec<Entry> = Vec::new();

        let mut walkdir = WalkDir::new(&self.root);
        // An ignored root is walked as empty so its contents never leak in
        if self.root.file_name().is_some_and(|name| self.is_ignored(name)) {
            debug!(root = %self.root.display(), "Walk root is ignored; skipping its contents");
            walkdir = walkdir.max_depth(0);
        }

        let walker = walkdir
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.is_ignored(e.file_name()));

        for dent in walker {
            let dent = dent.map_err(walk_error)?;
            let depth = dent.depth();

            // Pre-order reached a shallower (or equal) depth: those subtrees are done
            while open.last().is_some_and(|dir| dir.depth >= depth) {
                if let Some(dir) = open.pop() {
                    entries.push(dir);
                }
            }

            let entry = classify(&dent)?;
            match entry.kind {
                EntryKind::Directory => open.push(entry),
                EntryKind::File { .. } => entries.push(entry),
            }
        }

        while let Some(dir) = open.pop() {
            entries.push(dir);
        }

        Ok(entries)
    }

    /// Check if an entry name matches an ignore name
    fn is_ignored(&self, name: &OsStr) -> bool {
        self.config
            .ignore_names
            .iter()
            .any(|ignored| name == OsStr::new(ignored))
    }
}

fn classify(dent: &DirEntry) -> Result<Entry, StorageError> {
    let path = dent.path().to_path_buf();
    let file_type = dent.file_type();

    let kind = if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_file() {
        let metadata = dent.metadata().map_err(walk_error)?;
        EntryKind::File {
            executable: is_executable(&metadata),
        }
    } else if file_type.is_symlink() {
        return Err(unsupported(&path, "symbolic links are not supported"));
    } else {
        return Err(unsupported(&path, "special files are not supported"));
    };

    let name = if dent.depth() == 0 {
        dent.file_name().to_string_lossy().into_owned()
    } else {
        dent.file_name()
            .to_str()
            .ok_or_else(|| {
                StorageError::IoError(std::io::Error::new(
                    ErrorKind::InvalidData,
                    format!("File name is not valid UTF-8: {:?}", path),
                ))
            })?
            .to_string()
    };

    Ok(Entry {
        path,
        name,
        depth: dent.depth(),
        kind,
    })
}

#[cfg(unix)]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &std::fs::Metadata) -> bool {
    false
}

fn unsupported(path: &Path, reason: &str) -> StorageError {
    StorageError::IoError(std::io::Error::new(
        ErrorKind::Unsupported,
        format!("Cannot snapshot {:?}: {}", path, reason),
    ))
}

fn walk_error(err: walkdir::Error) -> StorageError {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
    StorageError::io("walk", &path, err.into())
}
