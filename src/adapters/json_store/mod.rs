//! JSON file adapter: Implementation of CredentialStore.
//!
//! The file is a single JSON object mapping usernames to
//! `{"name": ..., "password": ...}`.
//!
//! # Durability
//!
//! - A missing or malformed file reads as an empty store; it never fails a login
//! - Entries that do not parse as a credential record are invisible to reads
//!   but written back unchanged, so one bad record never costs the others
//! - A file that cannot be read, or is not a JSON object, is never overwritten
//! - Writes go to a temporary file in the same directory and are renamed over
//!   the original, so readers see either the old or the new map
//! - Read-modify-write sequences are serialized by an in-process mutex; there is
//!   no cross-process locking

use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Deserialize;
use serde_json::Value;
use tempfile::NamedTempFile;

use super::StoreError;
use crate::domain::CredentialRecord;
use crate::ports::CredentialStore;

/// On-disk map, kept schema-agnostic so unknown entries survive a rewrite.
type RawUsers = BTreeMap<String, Value>;

/// Credential store backed by a JSON file.
pub struct JsonCredentialStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonCredentialStore {
    /// Create a store for the given file. The file need not exist yet.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the raw user map. A missing file is empty.
    ///
    /// # Errors
    /// Returns `StoreError::Io` for any other read failure and
    /// `StoreError::Serialization` when the content is not a JSON object.
    fn read_raw(&self) -> Result<RawUsers, StoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(RawUsers::new()),
            Err(e) => return Err(StoreError::Io(e)),
        };
        serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Load the raw map for a read, treating an unusable file as empty.
    fn load_for_read(&self) -> RawUsers {
        self.read_raw().unwrap_or_else(|e| {
            tracing::warn!(
                "Credential file {:?} unusable ({}), treating as empty",
                self.path,
                e
            );
            RawUsers::new()
        })
    }

    /// Parse one entry, logging and skipping records with a bad shape.
    fn parse_entry(username: &str, value: &Value) -> Option<CredentialRecord> {
        match CredentialRecord::deserialize(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping malformed credential entry {:?}: {}", username, e);
                None
            }
        }
    }

    /// Atomically replace the file with the given map.
    fn save_raw(&self, users: &RawUsers) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer(&mut tmp, users)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

impl CredentialStore for JsonCredentialStore {
    type Error = StoreError;

    fn get(&self, username: &str) -> Result<Option<CredentialRecord>, Self::Error> {
        Ok(self
            .load_for_read()
            .get(username)
            .and_then(|value| Self::parse_entry(username, value)))
    }

    fn insert_new(&self, username: &str, record: &CredentialRecord) -> Result<bool, Self::Error> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::LockPoisoned)?;

        let mut users = self.read_raw().inspect_err(|e| {
            tracing::error!("Refusing to rewrite credential file {:?}: {}", self.path, e);
        })?;
        // A malformed entry still occupies its username.
        if users.contains_key(username) {
            return Ok(false);
        }
        let value =
            serde_json::to_value(record).map_err(|e| StoreError::Serialization(e.to_string()))?;
        users.insert(username.to_string(), value);
        self.save_raw(&users)?;

        tracing::info!("Stored new account ({} total)", users.len());
        Ok(true)
    }

    fn count(&self) -> Result<usize, Self::Error> {
        Ok(self
            .load_for_read()
            .iter()
            .filter(|(name, value)| Self::parse_entry(name, value).is_some())
            .count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().expect("tempdir");
        let store = JsonCredentialStore::new(dir.path().join("user_db.json"));

        assert_eq!(store.count().expect("Should count"), 0);
        assert!(store.get("alice").expect("Should read").is_none());
    }

    #[test]
    fn test_malformed_file_is_empty() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("user_db.json");
        std::fs::write(&path, "{not json").expect("write");

        let store = JsonCredentialStore::new(&path);
        assert_eq!(store.count().expect("Should count"), 0);
    }

    #[test]
    fn test_bad_entry_does_not_lose_other_accounts() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("user_db.json");
        std::fs::write(
            &path,
            r#"{"alice": {"name": "Alice", "password": "hash-a"}, "bob": {"password": "hash-b"}}"#,
        )
        .expect("write");

        let store = JsonCredentialStore::new(&path);
        assert_eq!(store.count().expect("Should count"), 1);
        assert!(store.get("bob").expect("Should read").is_none());

        let carol = CredentialRecord::new("Carol", "hash-c");
        assert!(store.insert_new("carol", &carol).expect("Should insert"));
        // The bob entry still holds its username
        assert!(!store.insert_new("bob", &carol).expect("Should not fail"));

        let alice = store.get("alice").expect("Should read").expect("Should exist");
        assert_eq!(alice.password_hash, "hash-a");
        assert_eq!(store.count().expect("Should count"), 2);

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).expect("read")).expect("json");
        assert_eq!(raw["bob"]["password"], "hash-b");
    }

    #[test]
    fn test_unusable_file_is_not_overwritten() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("user_db.json");
        std::fs::write(&path, "{not json").expect("write");

        let store = JsonCredentialStore::new(&path);
        let record = CredentialRecord::new("Carol", "hash-c");
        assert!(matches!(
            store.insert_new("carol", &record),
            Err(StoreError::Serialization(_))
        ));
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "{not json");
    }

    #[test]
    fn test_read_error_is_not_overwritten() {
        let dir = tempdir().expect("tempdir");
        // A directory at the store path fails to read with something other than NotFound
        let path = dir.path().join("user_db.json");
        std::fs::create_dir(&path).expect("mkdir");

        let store = JsonCredentialStore::new(&path);
        assert_eq!(store.count().expect("Should count"), 0);
        let record = CredentialRecord::new("Carol", "hash-c");
        assert!(matches!(store.insert_new("carol", &record), Err(StoreError::Io(_))));
        assert!(path.is_dir());
    }

    #[test]
    fn test_insert_and_reload() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("user_db.json");
        let store = JsonCredentialStore::new(&path);

        let record = CredentialRecord::new("Alice", "$argon2id$placeholder");
        assert!(store.insert_new("alice", &record).expect("Should insert"));

        // A second handle on the same file sees the record
        let reopened = JsonCredentialStore::new(&path);
        let loaded = reopened.get("alice").expect("Should read").expect("Should exist");
        assert_eq!(loaded.display_name, "Alice");
        assert_eq!(reopened.count().expect("Should count"), 1);
    }

    #[test]
    fn test_insert_duplicate_keeps_original() {
        let dir = tempdir().expect("tempdir");
        let store = JsonCredentialStore::new(dir.path().join("user_db.json"));

        let first = CredentialRecord::new("Alice", "hash-one");
        let second = CredentialRecord::new("Mallory", "hash-two");
        assert!(store.insert_new("alice", &first).expect("Should insert"));
        assert!(!store.insert_new("alice", &second).expect("Should not fail"));

        let loaded = store.get("alice").expect("Should read").expect("Should exist");
        assert_eq!(loaded.password_hash, "hash-one");
        assert_eq!(store.count().expect("Should count"), 1);
    }

    #[test]
    fn test_reads_legacy_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("user_db.json");
        std::fs::write(
            &path,
            r#"{"ishita": {"name": "Ishita", "password": "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"}}"#,
        )
        .expect("write");

        let store = JsonCredentialStore::new(&path);
        let record = store.get("ishita").expect("Should read").expect("Should exist");
        assert_eq!(record.display_name, "Ishita");
        assert!(record.created_at.is_none());
    }
}
