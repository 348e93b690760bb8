//! Header framing and content hashing using SHA-256

use crate::object::{FramedObject, ObjectKind};
use crate::types::ObjectId;
use sha2::{Digest, Sha256};

/// Build the `"<kind> <len>\0"` header for a payload
fn header(kind: ObjectKind, payload_len: usize) -> Vec<u8> {
    let mut header = format!("{} {}", kind.as_str(), payload_len).into_bytes();
    header.push(0);
    header
}

/// Frame a payload and compute its content hash
///
/// The hash covers the header as well as the payload, so the same bytes
/// stored as a blob and as a tree get different identities.
pub fn frame_and_hash(kind: ObjectKind, payload: &[u8]) -> FramedObject {
    let mut content = header(kind, payload.len());
    let header_len = content.len();
    content.extend_from_slice(payload);

    let id = ObjectId::from_bytes(Sha256::digest(&content).into());

    FramedObject::from_parts(kind, id, header_len, content)
}

/// Compute the content hash of a payload without keeping the framed bytes
pub fn hash_object(kind: ObjectKind, payload: &[u8]) -> ObjectId {
    let mut hasher = Sha256::new();
    hasher.update(header(kind, payload.len()));
    hasher.update(payload);
    ObjectId::from_bytes(hasher.finalize().into())
}

/// Hash already-framed bytes (used to verify objects read back from disk)
pub(crate) fn hash_framed(framed: &[u8]) -> ObjectId {
    ObjectId::from_bytes(Sha256::digest(framed).into())
}
