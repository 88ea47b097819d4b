// ABOUTME: SQLite-backed key/value medium: one row per key in a single kv table.
// ABOUTME: Each set() is a single upsert, so a value is either fully written or not at all.

use std::path::Path;

use rusqlite::{Connection, params};

use crate::backend::{BackendError, KeyValueBackend, check_quota};

/// Stores every key as a row of an embedded SQLite database.
pub struct SqliteBackend {
    conn: Connection,
    quota: Option<u64>,
}

impl SqliteBackend {
    /// Open or create a database at the given path and ensure the kv table exists.
    pub fn open(path: &Path) -> Result<Self, BackendError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::init(conn)
    }

    /// An in-memory database, mainly for tests.
    pub fn open_in_memory() -> Result<Self, BackendError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, BackendError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(Self { conn, quota: None })
    }

    /// Limit the total bytes (keys plus values) stored in the table.
    pub fn with_quota(mut self, limit: u64) -> Self {
        self.quota = Some(limit);
        self
    }

    fn used_by_others(&self, key: &str) -> Result<u64, BackendError> {
        let used: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(LENGTH(CAST(key AS BLOB)) + LENGTH(CAST(value AS BLOB))), 0)
             FROM kv WHERE key != ?1",
            params![key],
            |row| row.get(0),
        )?;
        Ok(used.max(0) as u64)
    }
}

impl KeyValueBackend for SqliteBackend {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        let result = self.conn.query_row(
            "SELECT value FROM kv WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(BackendError::Sqlite(e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), BackendError> {
        if self.quota.is_some() {
            check_quota(self.quota, key, value, self.used_by_others(key)?)?;
        }
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), BackendError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}
