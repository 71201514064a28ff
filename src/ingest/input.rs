//! Reading log files from disk.

use std::path::Path;

use tracing::warn;

use crate::error::Result;

/// Reads the whole log at `path` and decodes it with [`decode_log`].
///
/// The file is held in memory for the duration of the run.
pub fn read_log(path: impl AsRef<Path>) -> Result<String> {
    let raw = std::fs::read(path)?;
    Ok(decode_log(&raw))
}

/// Decodes each line as UTF-8, falling back to Latin-1 for lines that are
/// not valid UTF-8. Every byte of a fallback line maps to one character, so
/// no input is replaced or dropped.
pub fn decode_log(raw: &[u8]) -> String {
    let mut out = String::with_capacity(raw.len());
    for (idx, chunk) in raw.split_inclusive(|&b| b == b'\n').enumerate() {
        match std::str::from_utf8(chunk) {
            Ok(text) => out.push_str(text),
            Err(_) => {
                warn!(line = idx + 1, "line is not valid UTF-8, decoded as Latin-1");
                out.extend(chunk.iter().map(|&b| char::from(b)));
            }
        }
    }
    out
}
