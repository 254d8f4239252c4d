//! Session-backed implementation of the [`LoginService`] driving port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeDelta;
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::ports::{AuthenticatedSession, LoginService, SessionRepository, UserRepository};
use crate::domain::repository_errors::{map_session_error, map_user_error};
use crate::domain::{Error, LoginCredentials, Session, SessionToken, User};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Verifies passwords against stored Argon2 hashes and issues sessions.
#[derive(Clone)]
pub struct SessionLoginService<U, S> {
    users: Arc<U>,
    sessions: Arc<S>,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
}

impl<U, S> SessionLoginService<U, S> {
    /// Create the service; sessions live for `ttl` after login.
    pub fn new(users: Arc<U>, sessions: Arc<S>, clock: Arc<dyn Clock>, ttl: TimeDelta) -> Self {
        Self {
            users,
            sessions,
            clock,
            ttl,
        }
    }
}

#[async_trait]
impl<U, S> LoginService for SessionLoginService<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthenticatedSession, Error> {
        let Some(found) = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_user_error)?
        else {
            debug!(username = credentials.username(), "login for unknown user");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        if !found.password_hash.verify(credentials.password()) {
            debug!(user_id = %found.user.id(), "login with wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let now = self.clock.utc();
        let token = SessionToken::generate();
        let session = Session {
            token_hash: token.hash(),
            user_id: found.user.id().clone(),
            expires_at: now + self.ttl,
            created_at: now,
        };
        self.sessions
            .create(&session)
            .await
            .map_err(map_session_error)?;
        self.users
            .touch_last_login(found.user.id(), now)
            .await
            .map_err(map_user_error)?;

        match self.sessions.delete_expired(now).await {
            Ok(0) => {}
            Ok(purged) => debug!(purged, "purged expired sessions"),
            Err(error) => warn!(%error, "failed to purge expired sessions"),
        }

        info!(user_id = %found.user.id(), role = %found.user.role(), "user logged in");
        Ok(AuthenticatedSession {
            user: found.user.with_last_login(Some(now)),
            token,
            expires_at: session.expires_at,
        })
    }

    async fn authenticate_session(&self, token: &SessionToken) -> Result<User, Error> {
        let session = self
            .sessions
            .find_by_token_hash(&token.hash())
            .await
            .map_err(map_session_error)?
            .ok_or_else(|| Error::unauthorized("not authenticated"))?;

        if session.is_expired(self.clock.utc()) {
            return Err(Error::unauthorized("session expired"));
        }

        self.users
            .find_by_id(&session.user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("not authenticated"))
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
