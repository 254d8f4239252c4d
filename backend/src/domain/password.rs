//! Argon2id password hashing for stored user credentials.

use std::fmt;

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash as PhcHash, PasswordHasher, PasswordVerifier, SaltString,
};
use tracing::warn;

/// Failure while deriving a password hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password hashing failed: {message}")]
pub struct PasswordHashError {
    message: String,
}

/// PHC-formatted Argon2id hash as stored in the `users` table.
///
/// `Debug` output is redacted so hashes never land in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Examples
    /// ```
    /// use looma_backend::domain::PasswordHash;
    ///
    /// let hash = PasswordHash::hash("namaste").expect("hash");
    /// assert!(hash.verify("namaste"));
    /// assert!(!hash.verify("wrong"));
    /// ```
    pub fn hash(password: &str) -> Result<Self, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| Self(hash.to_string()))
            .map_err(|err| PasswordHashError {
                message: err.to_string(),
            })
    }

    /// Wrap a PHC string loaded from storage.
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// Check a candidate password. Malformed stored hashes never match.
    pub fn verify(&self, password: &str) -> bool {
        let parsed = match PhcHash::new(&self.0) {
            Ok(parsed) => parsed,
            Err(error) => {
                warn!(%error, "stored password hash is not a valid PHC string");
                return false;
            }
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    pub fn as_phc(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}
