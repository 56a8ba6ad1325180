//! Password hashing for stored credentials.
//!
//! This module provides:
//! - Argon2id hashing into self-describing PHC strings (random salt per record)
//! - Verification of PHC strings
//! - Verification of legacy records holding a bare, unsalted SHA-256 hex digest
//!
//! # Security
//!
//! - Argon2id is memory-hard, resistant to GPU/ASIC attacks
//! - Legacy SHA-256 records are accepted for login only; new records never use it
//! - Digest comparison is constant-time

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Argon2id memory cost in KiB.
#[cfg(not(test))]
const ARGON2_MEMORY_KIB: u32 = 47104;
#[cfg(test)]
const ARGON2_MEMORY_KIB: u32 = 1024;

const ARGON2_ITERATIONS: u32 = 1;
const ARGON2_PARALLELISM: u32 = 1;

/// Length of a hex-encoded SHA-256 digest.
const LEGACY_DIGEST_LEN: usize = 64;

/// Errors during password hashing.
#[derive(Debug, Error)]
pub enum KdfError {
    #[error("Key derivation failed: {0}")]
    Derivation(String),

    #[error("Invalid stored hash format")]
    InvalidFormat,
}

/// How a stored hash matched (or didn't).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Matched an Argon2id PHC string
    Valid,
    /// Matched a legacy unsalted SHA-256 digest
    ValidLegacy,
    Invalid,
}

impl Verification {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid)
    }
}

fn argon2() -> Result<Argon2<'static>, KdfError> {
    let params = Params::new(
        ARGON2_MEMORY_KIB,
        ARGON2_ITERATIONS,
        ARGON2_PARALLELISM,
        Some(32),
    )
    .map_err(|e| KdfError::Derivation(format!("Invalid Argon2 params: {e}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a password into an Argon2id PHC string.
///
/// # Errors
/// Returns error if key derivation fails.
pub fn hash_password(password: &str) -> Result<String, KdfError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| KdfError::Derivation(e.to_string()))?;
    Ok(hash.to_string())
}

/// Unsalted SHA-256 hex digest, the format of legacy credential files.
#[must_use]
pub fn legacy_sha256_hex(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Whether a stored hash is a legacy SHA-256 hex digest.
#[must_use]
pub fn is_legacy_hash(stored: &str) -> bool {
    stored.len() == LEGACY_DIGEST_LEN && stored.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Verify a password against a stored hash of either format.
///
/// # Errors
/// Returns `KdfError::InvalidFormat` if the stored hash is neither a PHC string
/// nor a legacy digest.
pub fn verify_password(password: &str, stored: &str) -> Result<Verification, KdfError> {
    if is_legacy_hash(stored) {
        let computed = legacy_sha256_hex(password);
        return Ok(if constant_time_eq_str(&computed, &stored.to_ascii_lowercase()) {
            Verification::ValidLegacy
        } else {
            Verification::Invalid
        });
    }

    let parsed = PasswordHash::new(stored).map_err(|_| KdfError::InvalidFormat)?;
    // Parameters come from the PHC string itself.
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(Verification::Valid),
        Err(argon2::password_hash::Error::Password) => Ok(Verification::Invalid),
        Err(e) => Err(KdfError::Derivation(e.to_string())),
    }
}

// Constant-time compare for ASCII strings (used for SHA-256 hex digests).
fn constant_time_eq_str(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes().iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verify_roundtrip() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("Hashing should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert_eq!(
            verify_password(password, &hash).expect("Should verify"),
            Verification::Valid
        );
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = hash_password("correct-horse-battery-staple").expect("Hashing should succeed");
        let result = verify_password("wrong-password", &hash).expect("Should verify");
        assert_eq!(result, Verification::Invalid);
        assert!(!result.is_valid());
    }

    #[test]
    fn test_different_salts_produce_different_hashes() {
        let first = hash_password("same_password").expect("Hashing should succeed");
        let second = hash_password("same_password").expect("Hashing should succeed");
        assert_ne!(first, second);
    }

    #[test]
    fn test_legacy_digest() {
        // sha256("password")
        let stored = "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8";
        assert!(is_legacy_hash(stored));
        assert_eq!(legacy_sha256_hex("password"), stored);

        assert_eq!(
            verify_password("password", stored).expect("Should verify"),
            Verification::ValidLegacy
        );
        assert_eq!(
            verify_password("Password", stored).expect("Should verify"),
            Verification::Invalid
        );
    }

    #[test]
    fn test_malformed_stored_hash() {
        let result = verify_password("anything", "not-a-hash");
        assert!(matches!(result, Err(KdfError::InvalidFormat)));
    }
}
