//! Frame parsing: the inverse of header framing

use crate::error::FrameError;
use crate::object::hasher::hash_framed;
use crate::object::{FramedObject, ObjectKind};
use crate::types::ObjectId;

/// Longest header that can be valid: `"commit "` plus the digits of `usize::MAX`
pub const MAX_HEADER_LEN: usize = 7 + 20;

/// Parsed `"<kind> <size>"` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub kind: ObjectKind,
    pub size: usize,
}

/// Parse the header text (without the trailing NUL)
pub fn parse_header(header: &[u8]) -> Result<Header, FrameError> {
    let text = std::str::from_utf8(header)
        .map_err(|_| FrameError::MalformedHeader(String::from_utf8_lossy(header).into_owned()))?;

    let (kind, size) = text
        .split_once(' ')
        .ok_or_else(|| FrameError::MalformedHeader(text.to_string()))?;

    let kind: ObjectKind = kind.parse()?;

    let canonical = !size.is_empty()
        && size.bytes().all(|b| b.is_ascii_digit())
        && (size == "0" || !size.starts_with('0'));
    if !canonical {
        return Err(FrameError::InvalidSize(size.to_string()));
    }
    let size = size
        .parse::<usize>()
        .map_err(|_| FrameError::InvalidSize(size.to_string()))?;

    Ok(Header { kind, size })
}

/// Split framed bytes at the first NUL and validate the header against the payload.
///
/// Returns the header and the header length including the NUL.
pub fn split_frame(content: &[u8]) -> Result<(Header, usize), FrameError> {
    let nul = content
        .iter()
        .position(|&b| b == 0)
        .ok_or(FrameError::MissingNul)?;

    let header = parse_header(&content[..nul])?;
    let actual = content.len() - nul - 1;
    if header.size != actual {
        return Err(FrameError::SizeMismatch {
            declared: header.size,
            actual,
        });
    }

    Ok((header, nul + 1))
}

/// Parse framed bytes into an object, hashing them to compute its id
pub fn parse_frame(content: Vec<u8>) -> Result<FramedObject, FrameError> {
    let id = hash_framed(&content);
    parse_frame_with_id(content, id)
}

/// Parse framed bytes, trusting the caller-supplied id
pub(crate) fn parse_frame_with_id(
    content: Vec<u8>,
    id: ObjectId,
) -> Result<FramedObject, FrameError> {
    let (header, header_len) = split_frame(&content)?;
    Ok(FramedObject::from_parts(header.kind, id, header_len, content))
}
