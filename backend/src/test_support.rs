//! Test utilities for the backend crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or with the
//! `test-support` feature.

use std::sync::{Arc, Mutex, MutexGuard};

use actix_web::cookie::Cookie;
use actix_web::web;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::{SchoolRepository, UserRepository};
use crate::domain::{
    Email, FieldActivityService, LoginCredentials, NewUser, PasswordHash, Role, School,
    SchoolDraft, SchoolService, SchoolStatus, SessionLoginService, User, UserAdminService,
    Username,
};
use crate::inbound::http::session::session_cookie;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::MemoryStore;

/// Password given to every user created through [`MemoryBackend::login_as`].
pub const TEST_PASSWORD: &str = "correct horse battery staple";

/// Session lifetime used by [`MemoryBackend`].
pub fn test_session_ttl() -> TimeDelta {
    TimeDelta::hours(168)
}

/// Clock whose time only moves when a test says so.
#[derive(Debug)]
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Clock pinned to 2025-01-01T00:00:00Z.
    pub fn fixed() -> Self {
        Self::new(fixed_now())
    }

    pub fn advance(&self, delta: TimeDelta) {
        *self.lock_clock() += delta;
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Reference instant shared by fixtures.
pub fn fixed_now() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single() {
        Some(now) => now,
        None => panic!("fixed timestamp"),
    }
}

/// Insert a user with a real Argon2 hash of `password`.
pub async fn seed_user<R>(repo: &Arc<R>, username: &str, password: &str, role: Role) -> User
where
    R: UserRepository + ?Sized,
{
    let new_user = NewUser {
        username: Username::new(username).unwrap_or_else(|err| panic!("username: {err}")),
        email: Email::new(format!("{username}@looma.test"))
            .unwrap_or_else(|err| panic!("email: {err}")),
        role,
        password_hash: PasswordHash::hash(password).unwrap_or_else(|err| panic!("hash: {err}")),
    };
    repo.create(&new_user)
        .await
        .unwrap_or_else(|err| panic!("seed user {username}: {err}"))
}

/// Fully wired HTTP state over a [`MemoryStore`] and a [`MutableClock`].
///
/// Handlers see the real domain services, so tests exercise the same code
/// path as production minus PostgreSQL.
#[derive(Clone)]
pub struct MemoryBackend {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<MutableClock>,
    pub state: HttpState,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(MutableClock::fixed());
        let dyn_clock: Arc<dyn Clock> = clock.clone();
        let schools = Arc::new(SchoolService::new(store.clone(), dyn_clock.clone()));
        let state = HttpState::new(HttpStatePorts {
            login: Arc::new(SessionLoginService::new(
                store.clone(),
                store.clone(),
                dyn_clock.clone(),
                test_session_ttl(),
            )),
            schools: schools.clone(),
            schools_command: schools,
            users: Arc::new(UserAdminService::new(store.clone())),
            field_activity: Arc::new(FieldActivityService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                dyn_clock,
            )),
        });
        Self {
            store,
            clock,
            state,
        }
    }

    pub fn data(&self) -> web::Data<HttpState> {
        web::Data::new(self.state.clone())
    }

    /// Create `username` with [`TEST_PASSWORD`] and `role`.
    pub async fn seed_user(&self, username: &str, role: Role) -> User {
        seed_user(&self.store, username, TEST_PASSWORD, role).await
    }

    /// Log in through the domain service and return the issued cookie.
    pub async fn session_cookie(&self, username: &str, password: &str) -> Cookie<'static> {
        let credentials = LoginCredentials::try_from_parts(username, password)
            .unwrap_or_else(|err| panic!("credentials: {err}"));
        let session = self
            .state
            .login
            .login(&credentials)
            .await
            .unwrap_or_else(|err| panic!("login {username}: {err}"));
        session_cookie(&session.token, session.expires_at, self.state.cookie)
    }

    /// Seed a user with `role` and return a valid session cookie for them.
    pub async fn login_as(&self, username: &str, role: Role) -> Cookie<'static> {
        self.seed_user(username, role).await;
        self.session_cookie(username, TEST_PASSWORD).await
    }

    /// Register a school through the command port and set its status.
    pub async fn seed_school(
        &self,
        name: &str,
        province: &str,
        district: &str,
        status: SchoolStatus,
    ) -> School {
        let draft = SchoolDraft::new(name, province, district)
            .unwrap_or_else(|err| panic!("draft {name}: {err}"));
        let school = self
            .state
            .schools_command
            .create(draft)
            .await
            .unwrap_or_else(|err| panic!("create {name}: {err}"));
        self.store
            .update_status(&school.id, status)
            .await
            .unwrap_or_else(|err| panic!("status {name}: {err}"));
        School { status, ..school }
    }
}
