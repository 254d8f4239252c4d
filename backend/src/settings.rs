//! Server settings loaded via OrthoConfig.
//!
//! Values come from `LOOMA_*` environment variables or the matching
//! `--kebab-case` flags. Unset values fall back to the defaults exposed by
//! the accessor methods.

use std::net::SocketAddr;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::domain::BootstrapAdmin;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_SESSION_TTL_HOURS: i64 = 168;
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_EMAIL: &str = "admin@looma.local";

/// Errors raised when a setting is present but unusable.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {message}")]
    BindAddr { value: String, message: String },
    #[error("session ttl must be a positive number of hours, got {0}")]
    SessionTtl(i64),
}

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LOOMA")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled connections.
    pub db_max_connections: Option<u32>,
    /// Session lifetime in hours.
    pub session_ttl_hours: Option<i64>,
    pub bootstrap_admin_username: Option<String>,
    /// Password for the first-run admin. Nothing is provisioned without it.
    pub bootstrap_admin_password: Option<String>,
    pub bootstrap_admin_email: Option<String>,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Non-blank database URL, if one is configured.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .filter(|max| *max > 0)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS)
    }

    pub fn session_ttl(&self) -> Result<TimeDelta, SettingsError> {
        let hours = self.session_ttl_hours.unwrap_or(DEFAULT_SESSION_TTL_HOURS);
        if hours <= 0 {
            return Err(SettingsError::SessionTtl(hours));
        }
        TimeDelta::try_hours(hours).ok_or(SettingsError::SessionTtl(hours))
    }

    /// Credentials for the admin created when the user table is empty.
    pub fn bootstrap_admin(&self) -> BootstrapAdmin {
        BootstrapAdmin {
            username: self
                .bootstrap_admin_username
                .clone()
                .unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_owned()),
            email: self
                .bootstrap_admin_email
                .clone()
                .unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.to_owned()),
            password: self.bootstrap_admin_password.clone().map(Zeroizing::new),
        }
    }
}
