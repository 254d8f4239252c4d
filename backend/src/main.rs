//! Backend entry-point: loads settings, prepares storage and serves the API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use looma_backend::inbound::http::health::HealthState;
use looma_backend::inbound::http::session_config::{BuildMode, cookie_settings_from_env};
use looma_backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use looma_backend::settings::ServerSettings;
use server::{ServerConfig, create_server};

fn invalid_config(err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string())
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().map_err(invalid_config)?;
    let cookie = cookie_settings_from_env(
        &mockable::DefaultEnv::new(),
        BuildMode::from_debug_assertions(),
    )
        .map_err(invalid_config)?;
    let bind_addr = settings.bind_addr().map_err(invalid_config)?;
    let session_ttl = settings.session_ttl().map_err(invalid_config)?;

    let mut config = ServerConfig::new(cookie, bind_addr, session_ttl)
        .with_bootstrap_admin(settings.bootstrap_admin());

    if let Some(database_url) = settings.database_url() {
        let applied = run_migrations(database_url)
            .await
            .map_err(|err| std::io::Error::other(format!("migrations failed: {err}")))?;
        info!(applied, "database migrations applied");
        let pool = DbPool::new(
            PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
        )
        .await
        .map_err(|err| std::io::Error::other(format!("database pool: {err}")))?;
        config = config.with_db_pool(pool);
    }

    #[cfg(feature = "metrics")]
    {
        config = config.with_metrics(Some(server::prometheus_metrics()?));
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).await?;
    info!(%bind_addr, "looma backend listening");
    server.await
}
