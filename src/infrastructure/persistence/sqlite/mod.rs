mod group_repo;

pub use group_repo::SqliteGroupRepository;

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::domain::error::DomainError;

pub type DbConnection = Arc<Mutex<Connection>>;

/// Initialize the SQLite database at `path` with a table for `collection`
pub fn init_database(path: &Path, collection: &str) -> anyhow::Result<DbConnection> {
    // Ensure directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!("Initializing database at {:?}", path);

    let conn = Connection::open(path)?;
    create_schema(&conn, collection)?;

    tracing::info!("Database initialized successfully");

    Ok(Arc::new(Mutex::new(conn)))
}

/// Volatile database, mainly for tests.
pub fn open_in_memory(collection: &str) -> anyhow::Result<DbConnection> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn, collection)?;
    Ok(Arc::new(Mutex::new(conn)))
}

fn create_schema(conn: &Connection, collection: &str) -> anyhow::Result<()> {
    let table = checked_table_name(collection)?;

    // members and member_count live in their own columns; body holds the
    // rest of the document as JSON.
    conn.execute(
        &format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id TEXT PRIMARY KEY,
                created_by TEXT NOT NULL,
                members TEXT NOT NULL,
                member_count INTEGER NOT NULL,
                body TEXT NOT NULL
            )"
        ),
        [],
    )?;

    conn.execute(
        &format!("CREATE INDEX IF NOT EXISTS idx_{table}_created_by ON {table} (created_by)"),
        [],
    )?;

    Ok(())
}

/// Collection names are spliced into SQL, so only plain identifiers pass.
pub(crate) fn checked_table_name(collection: &str) -> Result<&str, DomainError> {
    let mut chars = collection.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(collection)
    } else {
        Err(DomainError::Config(format!(
            "invalid collection name: {:?}",
            collection
        )))
    }
}
