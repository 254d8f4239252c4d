//! Admin-side account management.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{CreateUserRequest, UserAdministration, UserRepository};
use crate::domain::repository_errors::map_user_error;
use crate::domain::{Error, NewUser, PasswordHash, Role, User, UserId};

fn user_not_found(id: &UserId) -> Error {
    Error::not_found(format!("user {id} not found"))
}

/// Implements [`UserAdministration`] over a [`UserRepository`].
#[derive(Clone)]
pub struct UserAdminService<R> {
    repo: Arc<R>,
}

impl<R> UserAdminService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> UserAdministration for UserAdminService<R>
where
    R: UserRepository,
{
    async fn list(&self) -> Result<Vec<User>, Error> {
        self.repo.list().await.map_err(map_user_error)
    }

    async fn get(&self, id: &UserId) -> Result<User, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| user_not_found(id))
    }

    async fn create(&self, request: CreateUserRequest) -> Result<User, Error> {
        let CreateUserRequest {
            username,
            email,
            password,
            role,
        } = request;
        let password_hash = PasswordHash::hash(password.as_str())
            .map_err(|err| Error::internal(err.to_string()))?;
        let user = self
            .repo
            .create(&NewUser {
                username,
                email,
                role,
                password_hash,
            })
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id(), role = %user.role(), "user created");
        Ok(user)
    }

    async fn update_role(&self, id: &UserId, role: Role) -> Result<(), Error> {
        if self
            .repo
            .update_role(id, role)
            .await
            .map_err(map_user_error)?
        {
            info!(user_id = %id, %role, "user role changed");
            Ok(())
        } else {
            Err(user_not_found(id))
        }
    }

    async fn delete(&self, id: &UserId) -> Result<(), Error> {
        if self.repo.delete(id).await.map_err(map_user_error)? {
            info!(user_id = %id, "user deleted");
            Ok(())
        } else {
            Err(user_not_found(id))
        }
    }
}
