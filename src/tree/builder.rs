//! Snapshot builder: turns a file or directory into stored objects

use crate::error::StorageError;
use crate::object::{frame_and_hash, FramedObject, ObjectKind};
use crate::store::{ObjectStore, PutOutcome};
use crate::tree::path;
use crate::tree::walker::{Entry, EntryKind, Walker, WalkerConfig};
use crate::tree::{FileMode, Tree, TreeEntry};
use crate::types::ObjectId;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, instrument, trace};

/// Outcome of a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Blob id for a file root, tree id for a directory root
    pub root_id: ObjectId,
    pub root_kind: ObjectKind,
    /// Blob objects produced, including ones already stored
    pub blobs: usize,
    /// Tree objects produced, including ones already stored
    pub trees: usize,
    /// Total file content read
    pub bytes: u64,
    /// Objects that were not already in the store
    pub written: usize,
}

/// Builds snapshots into an object store
///
/// Directories are processed bottom-up: a tree object is only written once
/// every entry below it has been stored, so a stored tree never references a
/// missing object.
pub struct SnapshotBuilder<'a> {
    store: &'a dyn ObjectStore,
    walker_config: WalkerConfig,
}

impl<'a> SnapshotBuilder<'a> {
    pub fn new(store: &'a dyn ObjectStore) -> Self {
        Self {
            store,
            walker_config: WalkerConfig::default(),
        }
    }

    /// Set walker config (ignored names). Replaces the default, which only
    /// skips the store directory.
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Snapshot a file or directory and return the root object id
    pub fn snapshot(&self, path: &Path) -> Result<ObjectId, StorageError> {
        Ok(self.build(path)?.root_id)
    }

    /// Store a single file as a blob
    pub fn snapshot_file(&self, path: &Path) -> Result<ObjectId, StorageError> {
        let root = path::canonicalize_path(path)?;
        if !root.is_file() {
            return Err(not_a(&root, "regular file"));
        }
        Ok(self.build(&root)?.root_id)
    }

    /// Store a directory as a tree (recursively)
    pub fn snapshot_directory(&self, path: &Path) -> Result<ObjectId, StorageError> {
        let root = path::canonicalize_path(path)?;
        if !root.is_dir() {
            return Err(not_a(&root, "directory"));
        }
        Ok(self.build(&root)?.root_id)
    }

    /// Snapshot a file or directory and report what was stored
    ///
    /// Any failure aborts the snapshot. Objects stored before the failure
    /// stay in the store; they are valid objects, just unreferenced.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn build(&self, path: &Path) -> Result<Snapshot, StorageError> {
        let start = Instant::now();
        let root = path::canonicalize_path(path)?;
        info!(root = %root.display(), "Starting snapshot");

        let walker = Walker::with_config(root, self.walker_config.clone());
        let entries = match walker.walk() {
            Ok(e) => {
                debug!(entry_count = e.len(), "Walked filesystem");
                e
            }
            Err(e) => {
                error!("Filesystem walk failed: {}", e);
                return Err(e);
            }
        };

        let mut stats = Stats::default();
        // pending[d] collects the entries of the directory at depth d - 1 that
        // is currently being assembled
        let mut pending: Vec<Vec<TreeEntry>> = Vec::new();
        let mut root_object: Option<(ObjectId, ObjectKind)> = None;

        for entry in entries {
            trace!(path = %entry.path.display(), depth = entry.depth, "Visiting entry");

            let (mode, id) = match entry.kind {
                EntryKind::File { executable } => {
                    let id = self.store_blob(&entry, &mut stats)?;
                    (FileMode::from_executable(executable), id)
                }
                EntryKind::Directory => {
                    let children = pending
                        .get_mut(entry.depth + 1)
                        .map(std::mem::take)
                        .unwrap_or_default();
                    let id = self.store_tree(&entry, children, &mut stats)?;
                    (FileMode::Directory, id)
                }
            };

            if entry.depth == 0 {
                root_object = Some((id, mode.object_kind()));
            } else {
                if pending.len() <= entry.depth {
                    pending.resize_with(entry.depth + 1, Vec::new);
                }
                pending[entry.depth].push(TreeEntry::new(mode, entry.name, id)?);
            }
        }

        // The walker always emits the root last
        let (root_id, root_kind) = root_object.ok_or_else(|| {
            StorageError::IoError(std::io::Error::new(
                ErrorKind::NotFound,
                format!("Nothing to snapshot at {:?}", path),
            ))
        })?;

        let snapshot = Snapshot {
            root_id,
            root_kind,
            blobs: stats.blobs,
            trees: stats.trees,
            bytes: stats.bytes,
            written: stats.written,
        };

        info!(
            root_id = %snapshot.root_id,
            blobs = snapshot.blobs,
            trees = snapshot.trees,
            written = snapshot.written,
            bytes = snapshot.bytes,
            duration_ms = start.elapsed().as_millis(),
            "Snapshot completed"
        );

        Ok(snapshot)
    }

    fn store_blob(&self, entry: &Entry, stats: &mut Stats) -> Result<ObjectId, StorageError> {
        let content =
            std::fs::read(&entry.path).map_err(|e| StorageError::io("read", &entry.path, e))?;
        stats.blobs += 1;
        stats.bytes += content.len() as u64;
        self.put(frame_and_hash(ObjectKind::Blob, &content), stats)
    }

    fn store_tree(
        &self,
        entry: &Entry,
        children: Vec<TreeEntry>,
        stats: &mut Stats,
    ) -> Result<ObjectId, StorageError> {
        let mut tree = Tree::new();
        for child in children {
            tree.insert(child)?;
        }
        trace!(path = %entry.path.display(), entries = tree.len(), "Assembled tree");
        stats.trees += 1;
        self.put(tree.to_object(), stats)
    }

    fn put(&self, object: FramedObject, stats: &mut Stats) -> Result<ObjectId, StorageError> {
        if self.store.put(&object)? == PutOutcome::Written {
            stats.written += 1;
        }
        Ok(object.id())
    }
}

#[derive(Default)]
struct Stats {
    blobs: usize,
    trees: usize,
    bytes: u64,
    written: usize,
}

fn not_a(path: &Path, what: &str) -> StorageError {
    StorageError::IoError(std::io::Error::new(
        ErrorKind::InvalidInput,
        format!("{:?} is not a {}", path, what),
    ))
}
