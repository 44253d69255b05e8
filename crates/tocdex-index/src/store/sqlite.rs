use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::thread;

use rusqlite::types::Type;
use rusqlite::{Connection, ErrorCode, params};

use super::config::LockRetryPolicy;
use super::schema;
use crate::error::StoreError;
use crate::record::{EntryKind, IndexRecord, page_prefix};
use crate::sink::IndexSink;

/// An [`IndexSink`] writing to a docset's `searchIndex` table.
///
/// All statements are parameterized.
pub struct SqliteIndex {
    conn: Connection,
    policy: LockRetryPolicy,
}

impl SqliteIndex {
    /// Open (creating if missing) the database at `path` and make sure the
    /// table exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] if the file cannot be opened or the schema
    /// cannot be created.
    pub fn open<P: AsRef<Path>>(path: P, policy: LockRetryPolicy) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let open_error = |source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        };
        let conn = Connection::open(path).map_err(open_error)?;
        let index = Self::configure(conn, policy).map_err(open_error)?;
        log::debug!("opened index store {}", path.display());
        Ok(index)
    }

    /// An in-memory database (for dry runs and tests).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] if SQLite cannot create it.
    pub fn in_memory(policy: LockRetryPolicy) -> Result<Self, StoreError> {
        let open_error = |source| StoreError::Open {
            path: PathBuf::from(":memory:"),
            source,
        };
        let conn = Connection::open_in_memory().map_err(open_error)?;
        Self::configure(conn, policy).map_err(open_error)
    }

    fn configure(conn: Connection, policy: LockRetryPolicy) -> rusqlite::Result<Self> {
        conn.busy_timeout(policy.wait_per_attempt)?;
        schema::create_tables(&conn)?;
        Ok(Self { conn, policy })
    }

    /// The retry policy in use.
    #[must_use]
    pub const fn policy(&self) -> LockRetryPolicy {
        self.policy
    }

    /// Number of stored records.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Statement`] if the query fails.
    pub fn count(&self) -> Result<usize, StoreError> {
        self.with_retry("count", |conn| {
            conn.query_row("SELECT COUNT(*) FROM searchIndex", [], |row| {
                row.get::<_, i64>(0)
            })
        })
        .map(|n| usize::try_from(n).unwrap_or(0))
    }

    /// All records in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Statement`] if the query fails or a row holds an
    /// unknown entry type.
    pub fn records(&self) -> Result<Vec<IndexRecord>, StoreError> {
        self.with_retry("read records", |conn| {
            let mut stmt = conn.prepare("SELECT name, type, path FROM searchIndex ORDER BY id")?;
            let rows = stmt.query_map([], |row| {
                let kind: String = row.get(1)?;
                let kind = EntryKind::from_str(&kind).map_err(|err| {
                    rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(err))
                })?;
                Ok(IndexRecord {
                    name: row.get(0)?,
                    kind,
                    path: row.get(2)?,
                })
            })?;
            rows.collect()
        })
    }

    /// Run `op`, again if it fails on a busy or locked database, up to the
    /// policy's attempt count.
    fn with_retry<T>(
        &self,
        operation: &'static str,
        mut op: impl FnMut(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T, StoreError> {
        let attempts = self.policy.attempts.max(1);
        let mut attempt = 1;
        loop {
            match op(&self.conn) {
                Ok(value) => return Ok(value),
                Err(err) if attempt < attempts && lock_conflict(&err).is_some() => {
                    log::warn!(
                        "index store {operation}: database is locked (attempt {attempt}/{attempts}), retrying"
                    );
                    // The busy handler already waited for BUSY; LOCKED comes
                    // back immediately.
                    if lock_conflict(&err) == Some(ErrorCode::DatabaseLocked) {
                        thread::sleep(self.policy.wait_per_attempt);
                    }
                    attempt += 1;
                }
                Err(source) => return Err(StoreError::Statement { operation, source }),
            }
        }
    }
}

fn lock_conflict(err: &rusqlite::Error) -> Option<ErrorCode> {
    match err.sqlite_error_code() {
        Some(code @ (ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)) => Some(code),
        _ => None,
    }
}

impl IndexSink for SqliteIndex {
    fn clear_page(&mut self, page_path: &str) -> Result<usize, StoreError> {
        let prefix = page_prefix(page_path);
        self.with_retry("clear page", |conn| {
            conn.execute(
                "DELETE FROM searchIndex WHERE substr(path, 1, length(?1)) = ?1",
                params![prefix],
            )
        })
    }

    fn insert(&mut self, record: &IndexRecord) -> Result<(), StoreError> {
        let _ = self.with_retry("insert", |conn| {
            conn.execute(
                "INSERT INTO searchIndex (name, type, path) VALUES (?1, ?2, ?3)",
                params![record.name, record.kind.as_ref(), record.path],
            )
        })?;
        Ok(())
    }
}
