// src/ingest/cleanup.rs
//
// The marketplace export is not well-formed CSV: titles carry stray quote
// characters the exporter never escapes, and the bytes are ISO-8859-1.
// Each line is rewritten into proper CSV before structured parsing.

use std::fs;
use std::path::Path;

use crate::errors::SyncError;

/// ISO-8859-1 maps byte-for-byte onto the first 256 Unicode code points.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Rewrite one raw export line into well-formed CSV.
///
/// Steps: drop the line terminator and the outer quote pair, remove the
/// exporter's `***` markers, protect the real `","` field separators, turn
/// every remaining quote into `''`, restore the separators, re-wrap.
pub fn clean_line(raw: &[u8]) -> String {
    let mut end = raw.len();
    while end > 0 && (raw[end - 1] == b'\n' || raw[end - 1] == b'\r') {
        end -= 1;
    }
    let mut body = &raw[..end];
    if body.first() == Some(&b'"') {
        body = &body[1..];
    }
    if body.last() == Some(&b'"') {
        body = &body[..body.len() - 1];
    }

    let text = decode_latin1(body)
        .replace("***", "")
        .replace("\",\"", "\u{1},\u{1}")
        .replace('"', "''")
        .replace("\u{1},\u{1}", "\",\"");
    format!("\"{text}\"")
}

/// Read the raw export and return it as cleaned CSV text (header included).
/// A feed with no data rows is a fatal delivery error.
pub fn clean_feed(path: &Path) -> Result<String, SyncError> {
    let bytes = fs::read(path)
        .map_err(|e| SyncError::IoError(format!("Cannot read {}: {e}", path.display())))?;

    let lines: Vec<String> = bytes
        .split_inclusive(|&b| b == b'\n')
        .filter(|line| !line.iter().all(|&b| b == b'\r' || b == b'\n'))
        .map(clean_line)
        .collect();

    if lines.len() <= 1 {
        return Err(SyncError::EmptyInput(format!(
            "no data rows in {}",
            path.display()
        )));
    }
    Ok(lines.join("\n"))
}
