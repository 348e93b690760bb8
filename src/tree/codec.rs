//! Tree payload encoding
//!
//! Each entry becomes one line: `"<mode-octal> <name>\0<hash-hex>\n"`.
//! Lines are always emitted in ascending byte order of name, so the same
//! directory content encodes identically however the filesystem listed it.

use crate::error::StorageError;
use crate::tree::{validate_name, FileMode, TreeEntry};
use crate::types::ObjectId;

/// Encode entries into a canonical tree payload
pub fn encode(entries: &[TreeEntry]) -> Vec<u8> {
    let mut sorted: Vec<&TreeEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));

    let mut out = Vec::with_capacity(entries.len() * (ObjectId::HEX_LEN + 16));
    for entry in sorted {
        out.extend_from_slice(entry.mode.as_octal().as_bytes());
        out.push(b' ');
        out.extend_from_slice(entry.name.as_bytes());
        out.push(0);
        out.extend_from_slice(entry.id.to_hex().as_bytes());
        out.push(b'\n');
    }
    out
}

/// Decode a tree payload back into entries (in stored order)
pub fn decode(payload: &[u8]) -> Result<Vec<TreeEntry>, StorageError> {
    let mut lines: Vec<&[u8]> = payload.split(|&b| b == b'\n').collect();
    // The final newline terminates the last line rather than opening a new one
    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    lines
        .into_iter()
        .enumerate()
        .map(|(idx, line)| decode_line(idx + 1, line))
        .collect()
}

fn decode_line(line_no: usize, line: &[u8]) -> Result<TreeEntry, StorageError> {
    let nul = line
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| StorageError::malformed(line_no, "missing NUL separator"))?;

    let (prefix, hash) = (&line[..nul], &line[nul + 1..]);

    let prefix = std::str::from_utf8(prefix)
        .map_err(|_| StorageError::malformed(line_no, "mode and name are not valid UTF-8"))?;
    let (mode, name) = prefix
        .split_once(' ')
        .ok_or_else(|| StorageError::malformed(line_no, "missing space between mode and name"))?;

    let mode: FileMode = mode
        .parse()
        .map_err(|reason: String| StorageError::malformed(line_no, reason))?;

    validate_name(name).map_err(|reason| StorageError::malformed(line_no, reason))?;

    let id = std::str::from_utf8(hash)
        .ok()
        .and_then(|h| h.parse::<ObjectId>().ok())
        .ok_or_else(|| {
            StorageError::malformed(
                line_no,
                format!("invalid hash {:?}", String::from_utf8_lossy(hash)),
            )
        })?;

    Ok(TreeEntry {
        mode,
        name: name.to_string(),
        id,
    })
}
