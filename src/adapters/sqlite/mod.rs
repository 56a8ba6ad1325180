//! SQLite adapter: Implementation of CredentialStore.
//!
//! Selected when the configured store path ends in `.db` or `.sqlite`.
//!
//! # Atomicity
//!
//! Signup uses `INSERT ... ON CONFLICT DO NOTHING`, so a duplicate username is
//! rejected by the database itself rather than by a prior lookup.
//!
//! # Mutex Behavior
//!
//! The connection is protected by a `Mutex`. A poisoned mutex surfaces as
//! `StoreError::LockPoisoned`.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use super::StoreError;
use crate::domain::CredentialRecord;
use crate::ports::CredentialStore;

/// SQLite credential store.
pub struct SqliteCredentialStore {
    conn: Mutex<Connection>,
}

impl SqliteCredentialStore {
    /// Open (or create) a database at the given path.
    ///
    /// # Errors
    /// Returns error if database cannot be opened or initialized.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory SQLite database (for testing).
    ///
    /// # Errors
    /// Returns error if database cannot be created.
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;

        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS credentials (
                username TEXT PRIMARY KEY,
                display_name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TEXT
            );
            ",
        )?;

        Ok(())
    }
}

impl CredentialStore for SqliteCredentialStore {
    type Error = StoreError;

    fn get(&self, username: &str) -> Result<Option<CredentialRecord>, Self::Error> {
        let conn = self.lock()?;

        let row = conn
            .query_row(
                "SELECT display_name, password_hash, created_at FROM credentials WHERE username = ?1",
                params![username],
                |row| {
                    let display_name: String = row.get(0)?;
                    let password_hash: String = row.get(1)?;
                    let created_at: Option<String> = row.get(2)?;
                    Ok((display_name, password_hash, created_at))
                },
            )
            .optional()?;

        Ok(row.map(|(display_name, password_hash, created_at)| CredentialRecord {
            display_name,
            password_hash,
            created_at: created_at.and_then(|s| {
                chrono::DateTime::parse_from_rfc3339(&s)
                    .map(|dt| dt.with_timezone(&chrono::Utc))
                    .ok()
            }),
        }))
    }

    fn insert_new(&self, username: &str, record: &CredentialRecord) -> Result<bool, Self::Error> {
        let conn = self.lock()?;

        let changed = conn.execute(
            r"
            INSERT INTO credentials (username, display_name, password_hash, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(username) DO NOTHING
            ",
            params![
                username,
                record.display_name,
                record.password_hash,
                record.created_at.map(|dt| dt.to_rfc3339()),
            ],
        )?;

        if changed == 1 {
            tracing::info!("Stored new account");
        }
        Ok(changed == 1)
    }

    fn count(&self) -> Result<usize, Self::Error> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM credentials", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
