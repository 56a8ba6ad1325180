//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external libraries:
//! - `json_store`: flat JSON credential file (serde_json, tempfile)
//! - `sqlite`: SQLite credential store
//! - `linear_model`: exported linear classifiers with signed manifests
//! - `sanitize`: PII and secret filtering for logs

pub mod json_store;
pub mod linear_model;
pub mod sanitize;
pub mod sqlite;

/// Error type for credential storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Credential store lock poisoned")]
    LockPoisoned,
}

use std::path::Path;

use crate::config::StoreBackend;
use crate::domain::CredentialRecord;
use crate::ports::CredentialStore;

/// Credential store selected at startup from the configured path.
pub enum AnyCredentialStore {
    Json(json_store::JsonCredentialStore),
    Sqlite(sqlite::SqliteCredentialStore),
}

impl AnyCredentialStore {
    /// Open the backend matching the path's extension.
    ///
    /// # Errors
    /// Returns error if a SQLite database cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let store = match StoreBackend::for_path(path) {
            StoreBackend::Json => Self::Json(json_store::JsonCredentialStore::new(path)),
            StoreBackend::Sqlite => Self::Sqlite(sqlite::SqliteCredentialStore::new(path)?),
        };
        tracing::info!("Credential store: {:?} ({:?})", path, StoreBackend::for_path(path));
        Ok(store)
    }
}

impl CredentialStore for AnyCredentialStore {
    type Error = StoreError;

    fn get(&self, username: &str) -> Result<Option<CredentialRecord>, StoreError> {
        match self {
            Self::Json(s) => s.get(username),
            Self::Sqlite(s) => s.get(username),
        }
    }

    fn insert_new(&self, username: &str, record: &CredentialRecord) -> Result<bool, StoreError> {
        match self {
            Self::Json(s) => s.insert_new(username, record),
            Self::Sqlite(s) => s.insert_new(username, record),
        }
    }

    fn count(&self) -> Result<usize, StoreError> {
        match self {
            Self::Json(s) => s.count(),
            Self::Sqlite(s) => s.count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_selects_backend() {
        let dir = tempfile::tempdir().expect("tempdir");

        let json = AnyCredentialStore::open(dir.path().join("user_db.json")).expect("open json");
        assert!(matches!(json, AnyCredentialStore::Json(_)));

        let sqlite = AnyCredentialStore::open(dir.path().join("users.db")).expect("open sqlite");
        assert!(matches!(sqlite, AnyCredentialStore::Sqlite(_)));

        let record = CredentialRecord::new("Alice", "hash");
        assert!(sqlite.insert_new("alice", &record).expect("Should insert"));
        assert_eq!(sqlite.count().expect("Should count"), 1);
    }
}
