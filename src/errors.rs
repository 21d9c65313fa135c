use std::fmt;

/// Errors originating from either the sync logic
/// (input discovery, empty feeds) or downstream layers (DB, CSV, filesystem).
#[derive(Debug)]
pub enum SyncError {
    /// Zero or more than one candidate file in the input directory.
    InputDiscovery(String),
    /// The input file had no data rows after the header.
    EmptyInput(String),
    DbError(String),
    CsvError(String),
    IoError(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::InputDiscovery(msg) => write!(f, "Input Discovery Error: {msg}"),
            SyncError::EmptyInput(msg) => write!(f, "Empty Input: {msg}"),
            SyncError::DbError(msg) => write!(f, "Database Error: {msg}"),
            SyncError::CsvError(msg) => write!(f, "CSV Error: {msg}"),
            SyncError::IoError(msg) => write!(f, "I/O Error: {msg}"),
        }
    }
}

impl std::error::Error for SyncError {}
