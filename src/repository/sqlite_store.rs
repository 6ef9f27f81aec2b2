//! SQLite Store
//!
//! Key-value table in a local SQLite database, the on-disk counterpart
//! of browser local storage.

use std::path::Path;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};
use super::traits::KeyValueStore;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

fn internal(e: rusqlite::Error) -> DomainError {
    DomainError::Internal(e.to_string())
}

impl SqliteStore {
    /// Open (or create) the database file and run migrations
    pub fn open(path: &Path) -> DomainResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DomainError::Internal(format!("Failed to open {}: {}", path.display(), e)))?;
        Self::init(conn)
    }

    /// Private in-memory database, used by tests
    pub fn open_in_memory() -> DomainResult<Self> {
        Self::init(Connection::open_in_memory().map_err(internal)?)
    }

    fn init(conn: Connection) -> DomainResult<Self> {
        run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
    let query = format!("PRAGMA table_info({})", table);
    let Ok(mut stmt) = conn.prepare(&query) else {
        return false;
    };
    let Ok(names) = stmt.query_map([], |row| row.get::<_, String>(1)) else {
        return false;
    };
    let found = names.flatten().any(|name| name == column);
    found
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL
        )",
        [],
    )
    .map_err(internal)?;

    if !column_exists(conn, "kv", "updated_at") {
        conn.execute("ALTER TABLE kv ADD COLUMN updated_at INTEGER", [])
            .map_err(|e| DomainError::Internal(format!("Failed to add updated_at: {}", e)))?;
    }
    Ok(())
}

fn upsert(conn: &Connection, key: &str, value: &str, now: i64) -> DomainResult<()> {
    conn.execute(
        "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value, now],
    )
    .map_err(internal)?;
    Ok(())
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> DomainResult<Option<String>> {
        let conn = self.conn.lock().await;
        conn.query_row("SELECT value FROM kv WHERE key = ?", params![key], |row| row.get(0))
            .optional()
            .map_err(internal)
    }

    async fn set(&self, key: &str, value: &str) -> DomainResult<()> {
        let conn = self.conn.lock().await;
        upsert(&conn, key, value, chrono::Utc::now().timestamp_millis())
    }

    async fn set_many(&self, entries: &[(&str, String)]) -> DomainResult<()> {
        let mut conn = self.conn.lock().await;
        let now = chrono::Utc::now().timestamp_millis();
        let tx = conn.transaction().map_err(internal)?;
        for (key, value) in entries {
            upsert(&tx, key, value, now)?;
        }
        tx.commit().map_err(internal)
    }

    async fn remove(&self, key: &str) -> DomainResult<()> {
        let conn = self.conn.lock().await;
        conn.execute("DELETE FROM kv WHERE key = ?", params![key])
            .map_err(internal)?;
        Ok(())
    }
}
