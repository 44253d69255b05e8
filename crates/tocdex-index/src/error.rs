use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of an index store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database could not be opened or its schema created.
    #[error("failed to open index store {}: {source}", .path.display())]
    Open {
        /// Database file.
        path: PathBuf,
        /// Underlying SQLite error.
        source: rusqlite::Error,
    },

    /// A statement failed, after any lock retries.
    #[error("index store {operation} failed: {source}")]
    Statement {
        /// What was being done (`"insert"`, `"clear page"`, ...).
        operation: &'static str,
        /// Underlying SQLite error.
        source: rusqlite::Error,
    },
}

/// Failures that stop a page scan before it starts.
///
/// Problems inside the page (malformed markup, a failed insert) do not
/// surface here; they are reported through [`crate::ScanReport`].
#[derive(Debug, Error)]
pub enum ScanError {
    /// The page's previous records could not be removed.
    #[error("failed to clear index records for {page}: {source}")]
    ClearPage {
        /// Page path.
        page: String,
        /// Store failure.
        source: StoreError,
    },

    /// The local copy of the page could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// Local file.
        path: PathBuf,
        /// I/O failure.
        source: io::Error,
    },
}
