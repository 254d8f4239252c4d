//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call this port to exchange credentials for a session and
//! to resolve a session cookie back to a user, without knowing how sessions
//! are stored.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Error, LoginCredentials, SessionToken, User};

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub user: User,
    /// Raw token for the cookie; only its digest is stored.
    pub token: SessionToken,
    pub expires_at: DateTime<Utc>,
}

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify credentials and open a new session.
    ///
    /// Unknown usernames and wrong passwords fail identically with
    /// `unauthorized`.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthenticatedSession, Error>;

    /// Resolve a session token to its user; `unauthorized` when the session
    /// is unknown, expired, or its user no longer exists.
    async fn authenticate_session(&self, token: &SessionToken) -> Result<User, Error>;
}
