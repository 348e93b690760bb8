//! Directory snapshots
//!
//! A tree object encodes one directory as a name-sorted list of entries,
//! each pointing at a blob (file content) or another tree (subdirectory).

pub mod builder;
pub mod codec;
pub mod path;
pub mod walker;

pub use builder::{Snapshot, SnapshotBuilder};

use crate::error::StorageError;
use crate::object::{frame_and_hash, FramedObject, ObjectKind};
use crate::types::ObjectId;
use std::fmt;
use std::str::FromStr;

/// Entry mode, collapsed from POSIX permission bits to a closed set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileMode {
    /// Normal file (100644)
    Regular,
    /// File with any execute bit set (100755)
    Executable,
    /// Subdirectory (40000)
    Directory,
}

impl FileMode {
    pub fn as_octal(&self) -> &'static str {
        match self {
            FileMode::Regular => "100644",
            FileMode::Executable => "100755",
            FileMode::Directory => "40000",
        }
    }

    /// Kind of object an entry with this mode references
    pub fn object_kind(&self) -> ObjectKind {
        match self {
            FileMode::Directory => ObjectKind::Tree,
            FileMode::Regular | FileMode::Executable => ObjectKind::Blob,
        }
    }

    pub fn from_executable(executable: bool) -> Self {
        if executable {
            FileMode::Executable
        } else {
            FileMode::Regular
        }
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_octal())
    }
}

impl FromStr for FileMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "100644" => Ok(FileMode::Regular),
            "100755" => Ok(FileMode::Executable),
            "40000" => Ok(FileMode::Directory),
            other => Err(format!("unrecognized mode {:?}", other)),
        }
    }
}

/// One line of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: FileMode,
    pub name: String,
    pub id: ObjectId,
}

impl TreeEntry {
    /// Create an entry, rejecting names the tree format cannot carry
    pub fn new(mode: FileMode, name: impl Into<String>, id: ObjectId) -> Result<Self, StorageError> {
        let name = name.into();
        validate_name(&name).map_err(|reason| StorageError::malformed(0, reason))?;
        Ok(Self { mode, name, id })
    }

    /// Kind of the referenced object (tree for directories, blob otherwise)
    pub fn kind(&self) -> ObjectKind {
        self.mode.object_kind()
    }
}

/// Check that a name is a single path segment the line format can represent
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("empty name".to_string());
    }
    if name == "." || name == ".." {
        return Err(format!("reserved name {:?}", name));
    }
    if name.contains(['/', '\0', '\n']) {
        return Err(format!("name {:?} contains a separator, NUL or newline", name));
    }
    Ok(())
}

/// In-memory directory listing with unique names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry; names must be unique within the tree
    pub fn insert(&mut self, entry: TreeEntry) -> Result<(), StorageError> {
        if self.entries.iter().any(|e| e.name == entry.name) {
            return Err(StorageError::malformed(
                0,
                format!("duplicate name {:?}", entry.name),
            ));
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical payload bytes (entries sorted by name)
    pub fn encode(&self) -> Vec<u8> {
        codec::encode(&self.entries)
    }

    /// Encode and frame as a `tree` object
    pub fn to_object(&self) -> FramedObject {
        frame_and_hash(ObjectKind::Tree, &self.encode())
    }

    /// Decode a tree payload
    pub fn decode(payload: &[u8]) -> Result<Self, StorageError> {
        Ok(Self {
            entries: codec::decode(payload)?,
        })
    }
}
