//! Port for persisted login sessions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Session, SessionTokenHash};

use super::define_port_error;

define_port_error! {
    /// Errors raised by session repository adapters.
    pub enum SessionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "session repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "session repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &Session) -> Result<(), SessionRepositoryError>;

    /// Look a session up by token digest, expired or not.
    async fn find_by_token_hash(
        &self,
        token_hash: &SessionTokenHash,
    ) -> Result<Option<Session>, SessionRepositoryError>;

    /// Drop sessions whose expiry is at or before `now`; returns the count.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, SessionRepositoryError>;
}
