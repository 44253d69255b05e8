//! SQLite-backed docset index.
//!
//! The database is a Dash `docSet.dsidx`: one `searchIndex` table, written
//! by a single process, with a bounded retry when another process holds the
//! lock.

/// Lock retry policy.
pub mod config;
/// Table definitions.
pub mod schema;
/// The [`SqliteIndex`] sink.
pub mod sqlite;

pub use config::LockRetryPolicy;
pub use sqlite::SqliteIndex;
