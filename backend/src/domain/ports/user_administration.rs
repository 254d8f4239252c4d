//! Driving port for admin management of dashboard accounts.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::{Email, Error, Role, User, UserId, Username};

/// Validated input for `POST /api/users`.
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: Username,
    pub email: Email,
    pub password: Zeroizing<String>,
    pub role: Role,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAdministration: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, Error>;

    async fn get(&self, id: &UserId) -> Result<User, Error>;

    /// Create an account; `conflict` when the username is taken.
    async fn create(&self, request: CreateUserRequest) -> Result<User, Error>;

    async fn update_role(&self, id: &UserId, role: Role) -> Result<(), Error>;

    async fn delete(&self, id: &UserId) -> Result<(), Error>;
}
