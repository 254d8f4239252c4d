//! Builders wiring domain services over PostgreSQL or in-memory adapters.

use std::sync::Arc;

use chrono::TimeDelta;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use looma_backend::domain::ports::{
    AccessLogRepository, QrScanRepository, SchoolRepository, SessionRepository, UserRepository,
};
use looma_backend::domain::{
    BootstrapAdmin, FieldActivityService, SchoolService, SessionLoginService, UserAdminService,
    ensure_bootstrap_admin,
};
use looma_backend::inbound::http::state::{HttpState, HttpStatePorts};
use looma_backend::outbound::memory::MemoryStore;
use looma_backend::outbound::persistence::{
    DbPool, DieselAccessLogRepository, DieselQrScanRepository, DieselSchoolRepository,
    DieselSessionRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Driven adapters backing one running server.
struct Repositories<U, S, Sc, A, Q> {
    users: Arc<U>,
    sessions: Arc<S>,
    schools: Arc<Sc>,
    access_logs: Arc<A>,
    qr_scans: Arc<Q>,
}

impl Repositories<
    DieselUserRepository,
    DieselSessionRepository,
    DieselSchoolRepository,
    DieselAccessLogRepository,
    DieselQrScanRepository,
>
{
    fn diesel(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            sessions: Arc::new(DieselSessionRepository::new(pool.clone())),
            schools: Arc::new(DieselSchoolRepository::new(pool.clone())),
            access_logs: Arc::new(DieselAccessLogRepository::new(pool.clone())),
            qr_scans: Arc::new(DieselQrScanRepository::new(pool.clone())),
        }
    }
}

impl Repositories<MemoryStore, MemoryStore, MemoryStore, MemoryStore, MemoryStore> {
    fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            sessions: store.clone(),
            schools: store.clone(),
            access_logs: store.clone(),
            qr_scans: store,
        }
    }
}

impl<U, S, Sc, A, Q> Repositories<U, S, Sc, A, Q>
where
    U: UserRepository + 'static,
    S: SessionRepository + 'static,
    Sc: SchoolRepository + 'static,
    A: AccessLogRepository + 'static,
    Q: QrScanRepository + 'static,
{
    async fn bootstrap(&self, admin: Option<&BootstrapAdmin>) -> std::io::Result<()> {
        let Some(admin) = admin else {
            return Ok(());
        };
        ensure_bootstrap_admin(self.users.as_ref(), admin)
            .await
            .map(|_| ())
            .map_err(|err| std::io::Error::other(format!("bootstrap admin failed: {err}")))
    }

    fn into_ports(self, clock: Arc<dyn Clock>, session_ttl: TimeDelta) -> HttpStatePorts {
        let Self {
            users,
            sessions,
            schools,
            access_logs,
            qr_scans,
        } = self;
        let school_service = Arc::new(SchoolService::new(schools.clone(), clock.clone()));
        HttpStatePorts {
            login: Arc::new(SessionLoginService::new(
                users.clone(),
                sessions,
                clock.clone(),
                session_ttl,
            )),
            schools: school_service.clone(),
            schools_command: school_service,
            users: Arc::new(UserAdminService::new(users)),
            field_activity: Arc::new(FieldActivityService::new(
                schools,
                access_logs,
                qr_scans,
                clock,
            )),
        }
    }
}

/// Build HTTP state, provisioning the bootstrap admin first.
///
/// # Errors
/// Returns [`std::io::Error`] when the bootstrap admin cannot be created.
pub(super) async fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let admin = config.bootstrap_admin.as_ref();
    let ports = match &config.db_pool {
        Some(pool) => {
            info!("serving from PostgreSQL");
            let repos = Repositories::diesel(pool);
            repos.bootstrap(admin).await?;
            repos.into_ports(clock, config.session_ttl)
        }
        None => {
            warn!("no database configured; data will not survive a restart");
            let repos = Repositories::memory();
            repos.bootstrap(admin).await?;
            repos.into_ports(clock, config.session_ttl)
        }
    };
    Ok(HttpState::new(ports).with_cookie_settings(config.cookie))
}
