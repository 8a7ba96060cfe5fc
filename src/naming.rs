//! Station labels for pushes.
//!
//! A file holding a single push is labeled with the file stem alone. When a
//! file holds several pushes, each gets a letter suffix by ordinal: push 1 is
//! `<stem>A`, push 2 is `<stem>B`, up to push 26 (`<stem>Z`).

use std::path::Path;

use crate::error::PushError;

/// Highest push ordinal with a single-letter suffix.
pub const MAX_SUFFIXED_PUSHES: usize = 26;

/// Letter suffix of the 1-based push `ordinal`.
pub fn suffix(ordinal: usize) -> Result<char, PushError> {
    if ordinal == 0 || ordinal > MAX_SUFFIXED_PUSHES {
        return Err(PushError::LabelOverflow(ordinal));
    }
    Ok(char::from(b'A' + (ordinal - 1) as u8))
}

/// Station name of push `ordinal` (1-based) out of `push_count` pushes in the file.
pub fn station_name(file_id: &str, ordinal: usize, push_count: usize) -> Result<String, PushError> {
    if push_count <= 1 {
        return Ok(file_id.to_string());
    }
    Ok(format!("{file_id}{}", suffix(ordinal)?))
}

/// File identifier used for labels: the file name up to its first dot.
pub fn file_id(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.split_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => name,
    }
}
