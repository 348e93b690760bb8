//! Core identifier types.

use crate::error::StorageError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Raw 256-bit digest
pub type Hash = [u8; 32];

/// Identity of a stored object: the SHA-256 digest of its framed bytes.
///
/// Displays and parses as exactly 64 lowercase hexadecimal characters, which
/// is also the key used to derive the object's storage path.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(Hash);

impl ObjectId {
    /// Length of the hex rendering
    pub const HEX_LEN: usize = 64;

    pub fn from_bytes(bytes: Hash) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First 8 hex characters, for display
    pub fn short(&self) -> String {
        self.to_hex()[..8].to_string()
    }

    /// Fan-out directory name (first 2 hex characters)
    pub fn prefix(&self) -> String {
        self.to_hex()[..2].to_string()
    }

    /// File name inside the fan-out directory (remaining 62 hex characters)
    pub fn suffix(&self) -> String {
        self.to_hex()[2..].to_string()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // hex::decode accepts uppercase; the on-disk form never contains it
        let well_formed = s.len() == Self::HEX_LEN
            && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !well_formed {
            return Err(StorageError::InvalidObjectId(s.to_string()));
        }

        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|_| StorageError::InvalidObjectId(s.to_string()))?;
        Ok(Self(bytes))
    }
}
