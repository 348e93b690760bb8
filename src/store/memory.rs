//! In-memory object store

use crate::error::StorageError;
use crate::object::FramedObject;
use crate::store::{ObjectStore, PutOutcome};
use crate::types::ObjectId;
use std::collections::HashMap;
use std::sync::RwLock;

/// HashMap-backed object store for tests and embedding
///
/// Nothing is compressed or written to disk. A poisoned lock is recovered
/// since the map is never left half-updated.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<ObjectId, FramedObject>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All stored ids, sorted
    pub fn ids(&self) -> Vec<ObjectId> {
        let map = self.objects.read().unwrap_or_else(|e| e.into_inner());
        let mut ids: Vec<ObjectId> = map.keys().copied().collect();
        ids.sort();
        ids
    }
}

impl ObjectStore for MemoryObjectStore {
    fn put(&self, object: &FramedObject) -> Result<PutOutcome, StorageError> {
        let mut map = self.objects.write().unwrap_or_else(|e| e.into_inner());
        if map.contains_key(&object.id()) {
            return Ok(PutOutcome::AlreadyPresent);
        }
        map.insert(object.id(), object.clone());
        Ok(PutOutcome::Written)
    }

    fn get(&self, id: &ObjectId) -> Result<FramedObject, StorageError> {
        let map = self.objects.read().unwrap_or_else(|e| e.into_inner());
        map.get(id)
            .cloned()
            .ok_or(StorageError::ObjectNotFound(*id))
    }

    fn contains(&self, id: &ObjectId) -> Result<bool, StorageError> {
        let map = self.objects.read().unwrap_or_else(|e| e.into_inner());
        Ok(map.contains_key(id))
    }
}
