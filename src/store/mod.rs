//! Object Store
//!
//! Key-value persistence for framed objects, keyed by content hash. The
//! filesystem-backed [`LooseObjectStore`] keeps one zlib-compressed file per
//! object under a two-level, hash-prefixed directory layout.

pub mod loose;
pub mod memory;

pub use loose::LooseObjectStore;
pub use memory::MemoryObjectStore;

use crate::error::StorageError;
use crate::object::{FramedObject, ObjectKind};
use crate::types::ObjectId;
use serde::Serialize;

/// Reserved directory under the workspace root that holds the store
pub const DEFAULT_STORE_DIR: &str = ".gut";

/// Result of a `put`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// Object bytes were written
    Written,
    /// An object with this hash was already stored; nothing was written
    AlreadyPresent,
}

/// Header-level description of a stored object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectSummary {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub size: usize,
}

/// Object store interface
///
/// Objects are immutable: the same id always maps to the same bytes, so
/// repeating a `put` is always safe.
pub trait ObjectStore {
    /// Persist a framed object under its content hash
    fn put(&self, object: &FramedObject) -> Result<PutOutcome, StorageError>;

    /// Retrieve a framed object by content hash
    ///
    /// Fails with `ObjectNotFound` if absent and `CorruptObject` if the stored
    /// bytes cannot be decoded.
    fn get(&self, id: &ObjectId) -> Result<FramedObject, StorageError>;

    /// Check whether an object is stored
    fn contains(&self, id: &ObjectId) -> Result<bool, StorageError>;
}
