//! Credential store port: Trait for persistent account storage.
//!
//! This trait abstracts the storage backend (JSON file or SQLite) from the
//! authentication logic.

use crate::domain::CredentialRecord;

/// Trait for credential storage.
///
/// Records are created once and never updated or deleted. Implementations must
/// make `insert_new` atomic: of two concurrent signups for the same username,
/// exactly one succeeds.
pub trait CredentialStore: Send + Sync {
    /// Error type for storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Look up a record by username.
    ///
    /// # Returns
    /// `None` if the username is unknown.
    ///
    /// # Errors
    /// Returns error if the storage operation fails.
    fn get(&self, username: &str) -> Result<Option<CredentialRecord>, Self::Error>;

    /// Check if a username is taken.
    ///
    /// # Errors
    /// Returns error if the storage operation fails.
    fn contains(&self, username: &str) -> Result<bool, Self::Error> {
        Ok(self.get(username)?.is_some())
    }

    /// Insert a record unless the username already exists.
    ///
    /// # Returns
    /// `true` if the record was inserted, `false` if the username was taken
    /// (the existing record is left untouched).
    ///
    /// # Errors
    /// Returns error if the storage operation fails.
    fn insert_new(&self, username: &str, record: &CredentialRecord) -> Result<bool, Self::Error>;

    /// Number of stored accounts.
    ///
    /// # Errors
    /// Returns error if the storage operation fails.
    fn count(&self) -> Result<usize, Self::Error>;
}
