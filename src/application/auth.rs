//! Authentication service: signup, login and logout over a credential store.

use std::sync::Arc;

use thiserror::Error;

use crate::adapters::StoreError;
use crate::domain::kdf::{self, KdfError, Verification};
use crate::domain::{CredentialRecord, Session};
use crate::ports::CredentialStore;

/// Errors surfaced to the login and signup forms.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username already exists. Please choose another.")]
    DuplicateUser,

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("Please fill in all fields.")]
    MissingField,

    #[error("Username not found")]
    UnknownUser,

    #[error("Incorrect Password")]
    WrongPassword,

    #[error("Credential store error: {0}")]
    Store(#[from] StoreError),

    #[error("Password hashing failed: {0}")]
    Hash(#[from] KdfError),
}

fn store_err<E: Into<StoreError>>(e: E) -> AuthError {
    AuthError::Store(e.into())
}

/// Account registration and login.
pub struct AuthService<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
}

impl<S> AuthService<S>
where
    S: CredentialStore,
    S::Error: Into<StoreError>,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create an account.
    ///
    /// Checks run in a fixed order: an existing username wins over a password
    /// mismatch, which wins over blank fields.
    ///
    /// # Errors
    /// `DuplicateUser`, `PasswordMismatch` or `MissingField` for rejected input;
    /// `Store`/`Hash` if persistence fails.
    pub fn register(
        &self,
        username: &str,
        display_name: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<(), AuthError> {
        if self.store.contains(username).map_err(store_err)? {
            return Err(AuthError::DuplicateUser);
        }
        if password != confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        if username.is_empty() || display_name.is_empty() || password.is_empty() {
            return Err(AuthError::MissingField);
        }

        let record = CredentialRecord::new(display_name, kdf::hash_password(password)?);

        // Lost race against a concurrent signup
        if !self.store.insert_new(username, &record).map_err(store_err)? {
            return Err(AuthError::DuplicateUser);
        }

        tracing::info!("Account created");
        Ok(())
    }

    /// Verify credentials and mark the session authenticated.
    ///
    /// On failure the session is left untouched.
    ///
    /// # Returns
    /// The account's display name.
    ///
    /// # Errors
    /// `UnknownUser` or `WrongPassword`; `Store`/`Hash` for backend failures.
    pub fn login(
        &self,
        session: &mut Session,
        username: &str,
        password: &str,
    ) -> Result<String, AuthError> {
        let record = self
            .store
            .get(username)
            .map_err(store_err)?
            .ok_or(AuthError::UnknownUser)?;

        match kdf::verify_password(password, &record.password_hash)? {
            Verification::Valid => {}
            Verification::ValidLegacy => {
                tracing::warn!("Login matched a legacy unsalted SHA-256 credential");
            }
            Verification::Invalid => {
                tracing::info!("Login rejected: wrong password");
                return Err(AuthError::WrongPassword);
            }
        }

        session.authenticate(username, &record.display_name);
        tracing::info!("Login succeeded");
        Ok(record.display_name)
    }

    /// Clear authentication and the assistant transcript.
    pub fn logout(&self, session: &mut Session) {
        if session.is_authenticated() {
            tracing::info!("Logged out");
        }
        session.reset();
    }

    /// Number of registered accounts.
    ///
    /// # Errors
    /// Returns error if the store cannot be read.
    pub fn account_count(&self) -> Result<usize, AuthError> {
        self.store.count().map_err(store_err)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory store for service tests.
    #[derive(Default)]
    pub(crate) struct MemoryStore {
        users: Mutex<HashMap<String, CredentialRecord>>,
    }

    impl MemoryStore {
        pub(crate) fn with_record(username: &str, record: CredentialRecord) -> Self {
            let store = Self::default();
            store
                .users
                .lock()
                .expect("lock")
                .insert(username.to_string(), record);
            store
        }
    }

    impl CredentialStore for MemoryStore {
        type Error = StoreError;

        fn get(&self, username: &str) -> Result<Option<CredentialRecord>, StoreError> {
            Ok(self.users.lock().expect("lock").get(username).cloned())
        }

        fn insert_new(&self, username: &str, record: &CredentialRecord) -> Result<bool, StoreError> {
            let mut users = self.users.lock().expect("lock");
            if users.contains_key(username) {
                return Ok(false);
            }
            users.insert(username.to_string(), record.clone());
            Ok(true)
        }

        fn count(&self) -> Result<usize, StoreError> {
            Ok(self.users.lock().expect("lock").len())
        }
    }

    fn service() -> AuthService<MemoryStore> {
        AuthService::new(Arc::new(MemoryStore::default()))
    }

    #[test]
    fn test_register_then_login() {
        let auth = service();
        auth.register("ishita", "Ishita", "s3cret", "s3cret")
            .expect("Should register");

        let mut session = Session::new();
        let name = auth
            .login(&mut session, "ishita", "s3cret")
            .expect("Should log in");
        assert_eq!(name, "Ishita");
        assert!(session.is_authenticated());
        assert_eq!(session.display_name(), "Ishita");
    }

    #[test]
    fn test_stored_hash_is_argon2() {
        let store = Arc::new(MemoryStore::default());
        let auth = AuthService::new(Arc::clone(&store));
        auth.register("bob", "Bob", "pw", "pw").expect("Should register");

        let record = store.get("bob").expect("read").expect("exists");
        assert!(record.password_hash.starts_with("$argon2id$"));
        assert_ne!(record.password_hash, kdf::legacy_sha256_hex("pw"));
    }

    #[test]
    fn test_duplicate_user_keeps_first_record() {
        let auth = service();
        auth.register("bob", "Bob", "pw1", "pw1").expect("Should register");

        let err = auth.register("bob", "Robert", "pw2", "pw2").expect_err("must fail");
        assert!(matches!(err, AuthError::DuplicateUser));

        let mut session = Session::new();
        assert_eq!(auth.login(&mut session, "bob", "pw1").expect("Should log in"), "Bob");
        assert_eq!(auth.account_count().expect("count"), 1);
    }

    #[test]
    fn test_register_check_order() {
        let auth = service();
        auth.register("bob", "Bob", "pw", "pw").expect("Should register");

        // Duplicate wins over mismatch
        let err = auth.register("bob", "Bob", "a", "b").expect_err("must fail");
        assert!(matches!(err, AuthError::DuplicateUser));

        // Mismatch wins over blank fields
        let err = auth.register("", "", "a", "b").expect_err("must fail");
        assert!(matches!(err, AuthError::PasswordMismatch));

        let err = auth.register("carol", "", "pw", "pw").expect_err("must fail");
        assert!(matches!(err, AuthError::MissingField));

        let err = auth.register("carol", "Carol", "", "").expect_err("must fail");
        assert!(matches!(err, AuthError::MissingField));
        assert_eq!(auth.account_count().expect("count"), 1);
    }

    #[test]
    fn test_login_failures_leave_session_untouched() {
        let auth = service();
        auth.register("bob", "Bob", "pw", "pw").expect("Should register");
        let mut session = Session::new();

        let err = auth.login(&mut session, "nobody", "pw").expect_err("must fail");
        assert!(matches!(err, AuthError::UnknownUser));

        let err = auth.login(&mut session, "bob", "PW").expect_err("must fail");
        assert!(matches!(err, AuthError::WrongPassword));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_legacy_record_login() {
        let record = CredentialRecord {
            display_name: "Ishita".into(),
            password_hash: kdf::legacy_sha256_hex("password"),
            created_at: None,
        };
        let auth = AuthService::new(Arc::new(MemoryStore::with_record("ishita", record)));
        let mut session = Session::new();

        let err = auth.login(&mut session, "ishita", "wrong").expect_err("must fail");
        assert!(matches!(err, AuthError::WrongPassword));

        let name = auth
            .login(&mut session, "ishita", "password")
            .expect("Should log in");
        assert_eq!(name, "Ishita");
    }

    #[test]
    fn test_logout_resets_session() {
        let auth = service();
        auth.register("bob", "Bob", "pw", "pw").expect("Should register");
        let mut session = Session::new();
        auth.login(&mut session, "bob", "pw").expect("Should log in");
        session.ask("bmi");

        auth.logout(&mut session);
        assert!(!session.is_authenticated());
        assert_eq!(session.transcript().len(), 1);
    }
}
