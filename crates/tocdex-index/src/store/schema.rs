use rusqlite::Connection;

/// Create the `searchIndex` table if it does not exist.
///
/// # Errors
///
/// Returns the SQLite error if the statement fails.
pub fn create_tables(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}

/// The table Dash reads. `type` holds an entry kind name.
const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS searchIndex (
    id INTEGER PRIMARY KEY,
    name TEXT,
    type TEXT,
    path TEXT
);
";
