//! In-process repositories used when no database URL is configured.
//!
//! A single [`MemoryStore`] implements every driven port over one shared
//! state so cross-table rules hold the way the SQL schema enforces them:
//! activity rows must reference an existing school, deleting a school drops
//! its activity, and deleting a user drops that user's sessions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::ports::{
    AccessLogRepository, AccessLogRepositoryError, QrScanRepository, QrScanRepositoryError,
    SchoolRepository, SchoolRepositoryError, SessionRepository, SessionRepositoryError,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    AccessLog, CredentialedUser, NewAccessLog, NewQrScan, NewSchool, NewUser, QrScan, Role,
    School, SchoolChanges, SchoolFilter, SchoolId, SchoolStats, SchoolStatus, Session,
    SessionTokenHash, User, UserId,
};

#[derive(Debug, Default)]
struct MemoryState {
    schools: Vec<School>,
    users: Vec<CredentialedUser>,
    sessions: HashMap<String, Session>,
    access_logs: Vec<AccessLog>,
    qr_scans: Vec<QrScan>,
}

impl MemoryState {
    fn user_mut(&mut self, id: &UserId) -> Option<&mut CredentialedUser> {
        self.users.iter_mut().find(|found| found.user.id() == id)
    }
}

/// Shared in-memory backing store for all dashboard repositories.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Newest first, capped at `limit`.
fn newest<T: Clone>(rows: &[T], limit: u32, timestamp: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut recent = rows.to_vec();
    recent.sort_by_key(|row| std::cmp::Reverse(timestamp(row)));
    recent.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    recent
}

#[async_trait]
impl SchoolRepository for MemoryStore {
    async fn list(&self, filter: &SchoolFilter) -> Result<Vec<School>, SchoolRepositoryError> {
        let mut schools: Vec<School> = self
            .state()
            .schools
            .iter()
            .filter(|school| filter.matches(school))
            .cloned()
            .collect();
        schools.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(schools)
    }

    async fn find_by_id(&self, id: &SchoolId) -> Result<Option<School>, SchoolRepositoryError> {
        Ok(self
            .state()
            .schools
            .iter()
            .find(|school| &school.id == id)
            .cloned())
    }

    async fn create(&self, school: &NewSchool) -> Result<School, SchoolRepositoryError> {
        let created = school.clone().with_id(SchoolId::from_uuid(Uuid::new_v4()));
        self.state().schools.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: &SchoolId,
        changes: &SchoolChanges,
    ) -> Result<Option<School>, SchoolRepositoryError> {
        let mut state = self.state();
        Ok(state
            .schools
            .iter_mut()
            .find(|school| &school.id == id)
            .map(|school| {
                school.apply(changes);
                school.clone()
            }))
    }

    async fn update_status(
        &self,
        id: &SchoolId,
        status: SchoolStatus,
    ) -> Result<bool, SchoolRepositoryError> {
        let mut state = self.state();
        let Some(school) = state.schools.iter_mut().find(|school| &school.id == id) else {
            return Ok(false);
        };
        school.status = status;
        Ok(true)
    }

    async fn delete(&self, id: &SchoolId) -> Result<bool, SchoolRepositoryError> {
        let mut state = self.state();
        let before = state.schools.len();
        state.schools.retain(|school| &school.id != id);
        Ok(state.schools.len() != before)
    }

    async fn status_counts(&self) -> Result<SchoolStats, SchoolRepositoryError> {
        Ok(SchoolStats::from_schools(&self.state().schools))
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut users: Vec<User> = self
            .state()
            .users
            .iter()
            .map(|found| found.user.clone())
            .collect();
        users.sort_by(|a, b| a.username().as_ref().cmp(b.username().as_ref()));
        Ok(users)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .state()
            .users
            .iter()
            .find(|found| found.user.id() == id)
            .map(|found| found.user.clone()))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<CredentialedUser>, UserPersistenceError> {
        Ok(self
            .state()
            .users
            .iter()
            .find(|found| found.user.username().as_ref() == username)
            .cloned())
    }

    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut state = self.state();
        if state
            .users
            .iter()
            .any(|found| found.user.username() == &user.username)
        {
            return Err(UserPersistenceError::duplicate_username(
                user.username.as_ref(),
            ));
        }
        let created = User::new(
            UserId::from_uuid(Uuid::new_v4()),
            user.username.clone(),
            user.email.clone(),
            user.role,
        );
        state.users.push(CredentialedUser {
            user: created.clone(),
            password_hash: user.password_hash.clone(),
        });
        Ok(created)
    }

    async fn update_role(&self, id: &UserId, role: Role) -> Result<bool, UserPersistenceError> {
        let mut state = self.state();
        let Some(found) = state.user_mut(id) else {
            return Ok(false);
        };
        let user = &found.user;
        found.user = User::new(
            user.id().clone(),
            user.username().clone(),
            user.email().clone(),
            role,
        )
        .with_last_login(user.last_login());
        Ok(true)
    }

    async fn touch_last_login(
        &self,
        id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<(), UserPersistenceError> {
        if let Some(found) = self.state().user_mut(id) {
            found.user = found.user.clone().with_last_login(Some(at));
        }
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut state = self.state();
        let before = state.users.len();
        state.users.retain(|found| found.user.id() != id);
        if state.users.len() == before {
            return Ok(false);
        }
        state.sessions.retain(|_, session| &session.user_id != id);
        for entry in &mut state.access_logs {
            if entry.user_id.as_ref() == Some(id) {
                entry.user_id = None;
            }
        }
        Ok(true)
    }

    async fn count(&self) -> Result<u64, UserPersistenceError> {
        Ok(u64::try_from(self.state().users.len()).unwrap_or(u64::MAX))
    }
}

#[async_trait]
impl SessionRepository for MemoryStore {
    async fn create(&self, session: &Session) -> Result<(), SessionRepositoryError> {
        self.state()
            .sessions
            .insert(session.token_hash.as_str().to_owned(), session.clone());
        Ok(())
    }

    async fn find_by_token_hash(
        &self,
        token_hash: &SessionTokenHash,
    ) -> Result<Option<Session>, SessionRepositoryError> {
        Ok(self.state().sessions.get(token_hash.as_str()).cloned())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, SessionRepositoryError> {
        let mut state = self.state();
        let before = state.sessions.len();
        state.sessions.retain(|_, session| !session.is_expired(now));
        Ok(u64::try_from(before - state.sessions.len()).unwrap_or(u64::MAX))
    }
}

#[async_trait]
impl AccessLogRepository for MemoryStore {
    async fn append(&self, entry: &NewAccessLog) -> Result<AccessLog, AccessLogRepositoryError> {
        let created = entry.clone().with_id(Uuid::new_v4());
        self.state().access_logs.push(created.clone());
        Ok(created)
    }

    async fn recent(&self, limit: u32) -> Result<Vec<AccessLog>, AccessLogRepositoryError> {
        Ok(newest(&self.state().access_logs, limit, |entry| {
            entry.timestamp
        }))
    }
}

#[async_trait]
impl QrScanRepository for MemoryStore {
    async fn append(&self, scan: &NewQrScan) -> Result<QrScan, QrScanRepositoryError> {
        let created = scan.clone().with_id(Uuid::new_v4());
        self.state().qr_scans.push(created.clone());
        Ok(created)
    }

    async fn recent(&self, limit: u32) -> Result<Vec<QrScan>, QrScanRepositoryError> {
        Ok(newest(&self.state().qr_scans, limit, |scan| scan.timestamp))
    }
}
