//! Object model
//!
//! Every stored unit is a framed object: an ASCII header `"<kind> <size>"`,
//! one NUL byte, then the payload. The object's identity is the digest of
//! the whole framed byte sequence.

pub mod frame;
pub mod hasher;

pub use frame::parse_frame;
pub use hasher::{frame_and_hash, hash_object};

use crate::error::FrameError;
use crate::types::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Object kind enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// File content
    Blob,
    /// Directory listing
    Tree,
    /// Reserved; nothing produces commits yet
    Commit,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Blob => "blob",
            ObjectKind::Tree => "tree",
            ObjectKind::Commit => "commit",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blob" => Ok(ObjectKind::Blob),
            "tree" => Ok(ObjectKind::Tree),
            "commit" => Ok(ObjectKind::Commit),
            other => Err(FrameError::UnknownKind(other.to_string())),
        }
    }
}

/// A framed, hash-identified object.
///
/// Holds the full framed bytes so the store can write them without
/// re-assembling the header. Never mutated after construction.
#[derive(Clone, PartialEq, Eq)]
pub struct FramedObject {
    kind: ObjectKind,
    id: ObjectId,
    header_len: usize,
    content: Vec<u8>,
}

impl FramedObject {
    /// Assemble from parts that are already known to be consistent.
    pub(crate) fn from_parts(
        kind: ObjectKind,
        id: ObjectId,
        header_len: usize,
        content: Vec<u8>,
    ) -> Self {
        Self {
            kind,
            id,
            header_len,
            content,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Payload length in bytes
    pub fn size(&self) -> usize {
        self.content.len() - self.header_len
    }

    pub fn payload(&self) -> &[u8] {
        &self.content[self.header_len..]
    }

    /// Header, NUL and payload exactly as hashed and stored
    pub fn framed_bytes(&self) -> &[u8] {
        &self.content
    }

    pub fn into_payload(mut self) -> Vec<u8> {
        self.content.drain(..self.header_len);
        self.content
    }
}

impl fmt::Debug for FramedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FramedObject")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .field("size", &self.size())
            .finish()
    }
}

impl fmt::Display for FramedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({} bytes)", self.kind, self.id, self.size())
    }
}
