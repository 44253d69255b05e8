//! Table-of-contents scanning and docset index storage for tocdex.
//!
//! # Scope
//!
//! - **Page scanner**: walks a token stream once, tracking nesting depth,
//!   finds the element carrying the TOC marker and turns every link inside
//!   it into an [`IndexRecord`]
//! - **Sinks**: where records go. [`SqliteIndex`] writes the docset's
//!   `searchIndex` table, [`MemoryIndex`] keeps them in a `Vec`
//! - **Stylesheet hook**: [`StylesheetHandler`] is told about every
//!   `<link rel="stylesheet">` the scanner passes
//!
//! The scanner never builds a tree. It stops at the end tag that closes the
//! TOC container, at the end of the stream, or at the first malformed token.

/// Error types for scanning and storage.
pub mod error;
/// Index records and entry kinds.
pub mod record;
/// The single-pass TOC scanner.
pub mod scanner;
/// Record sinks and the stylesheet hook.
pub mod sink;
/// SQLite-backed docset index.
pub mod store;

pub use error::{ScanError, StoreError};
pub use record::{EntryKind, IndexRecord};
pub use scanner::{PageScanner, ScanReport, Termination, TocMarker};
pub use sink::{IndexSink, MemoryIndex, StylesheetHandler};
pub use store::{LockRetryPolicy, SqliteIndex};
