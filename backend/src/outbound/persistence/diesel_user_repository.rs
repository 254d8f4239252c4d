//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Rows carry the Argon2 hash; only `find_by_username` hands it to the
//! domain, every other read strips it via [`UserRow::into_user`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{CredentialedUser, NewUser, Role, User, UserId};

use super::diesel_basic_error_mapping::{
    ConstraintViolation, map_basic_pool_error, map_diesel_error_with,
};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

const USERNAME_UNIQUE_CONSTRAINT: &str = "users_username_key";

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error, username: Option<&str>) -> UserPersistenceError {
    map_diesel_error_with(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
        |violation, constraint| match (violation, constraint, username) {
            (ConstraintViolation::Unique, Some(USERNAME_UNIQUE_CONSTRAINT), Some(name)) => {
                Some(UserPersistenceError::duplicate_username(name))
            }
            _ => None,
        },
    )
}

fn map_read_error(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(error, None)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order_by(users::username.asc())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        rows.into_iter()
            .map(|row| row.into_user().map_err(UserPersistenceError::query))
            .collect()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        row.map(|row| row.into_user().map_err(UserPersistenceError::query))
            .transpose()
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<CredentialedUser>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        row.map(|row| row.into_credentialed().map_err(UserPersistenceError::query))
            .transpose()
    }

    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewUserRow {
            username: user.username.as_ref(),
            email: user.email.as_ref(),
            password_hash: user.password_hash.as_phc(),
            role: user.role.as_str(),
        };
        let row: UserRow = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(user.username.as_ref())))?;
        row.into_user().map_err(UserPersistenceError::query)
    }

    async fn update_role(&self, id: &UserId, role: Role) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(users::table.find(*id.as_uuid()))
            .set(users::role.eq(role.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(updated > 0)
    }

    async fn touch_last_login(
        &self,
        id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(users::table.find(*id.as_uuid()))
            .set(users::last_login.eq(Some(at)))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_read_error)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(users::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(deleted > 0)
    }

    async fn count(&self) -> Result<u64, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}
