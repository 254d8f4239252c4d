//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use chrono::TimeDelta;
use looma_backend::domain::BootstrapAdmin;
use looma_backend::inbound::http::session_config::CookieSettings;
use looma_backend::outbound::persistence::DbPool;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) cookie: CookieSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) session_ttl: TimeDelta,
    pub(crate) bootstrap_admin: Option<BootstrapAdmin>,
    pub(crate) db_pool: Option<DbPool>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(cookie: CookieSettings, bind_addr: SocketAddr, session_ttl: TimeDelta) -> Self {
        Self {
            cookie,
            bind_addr,
            session_ttl,
            bootstrap_admin: None,
            db_pool: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database connection pool.
    ///
    /// Without one every port is served by the in-memory store and data is
    /// lost on restart.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Provision `admin` on startup when no users exist.
    #[must_use]
    pub fn with_bootstrap_admin(mut self, admin: BootstrapAdmin) -> Self {
        self.bootstrap_admin = Some(admin);
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
