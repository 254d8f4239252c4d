//! Server-side login sessions.
//!
//! The browser holds an opaque random token in the `session_token` cookie.
//! Only the SHA-256 digest of that token is persisted, so a leaked sessions
//! table cannot be replayed.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::user::UserId;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE_NAME: &str = "session_token";
const TOKEN_BYTES: usize = 32;

/// Opaque bearer token handed to the browser.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(Zeroizing<String>);

impl SessionToken {
    /// Generate 256 random bits, hex encoded.
    pub fn generate() -> Self {
        let mut bytes = [0_u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(Zeroizing::new(hex::encode(bytes)))
    }

    /// Wrap a token read back from a cookie.
    pub fn from_cookie(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Digest stored in place of the token.
    pub fn hash(&self) -> SessionTokenHash {
        SessionTokenHash(hex::encode(Sha256::digest(self.0.as_bytes())))
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Hex SHA-256 of a [`SessionToken`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionTokenHash(String);

impl SessionTokenHash {
    /// Wrap a digest loaded from storage.
    pub fn from_hex(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// A persisted session row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token_hash: SessionTokenHash,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// A session is no longer valid once `now` reaches `expires_at`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
