//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{CredentialedUser, NewUser, Role, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The username is already taken.
        DuplicateUsername { username: String } => "username already exists: {username}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users ordered by username.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user with its password hash for credential checks.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<CredentialedUser>, UserPersistenceError>;

    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Change a user's role; `false` when the user does not exist.
    async fn update_role(&self, id: &UserId, role: Role) -> Result<bool, UserPersistenceError>;

    async fn touch_last_login(
        &self,
        id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<(), UserPersistenceError>;

    /// Remove a user and their sessions; `false` when absent.
    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError>;

    async fn count(&self) -> Result<u64, UserPersistenceError>;
}
