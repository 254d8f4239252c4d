//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they can be exercised against in-memory adapters or mocks without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    FieldActivity, LoginService, SchoolsCommand, SchoolsQuery, UserAdministration,
};

use super::session_config::CookieSettings;

/// Parameter object bundling the port implementations handlers call.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub schools: Arc<dyn SchoolsQuery>,
    pub schools_command: Arc<dyn SchoolsCommand>,
    pub users: Arc<dyn UserAdministration>,
    pub field_activity: Arc<dyn FieldActivity>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub schools: Arc<dyn SchoolsQuery>,
    pub schools_command: Arc<dyn SchoolsCommand>,
    pub users: Arc<dyn UserAdministration>,
    pub field_activity: Arc<dyn FieldActivity>,
    pub cookie: CookieSettings,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state with default (non-`Secure`) cookie settings.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            schools,
            schools_command,
            users,
            field_activity,
        } = ports;
        Self {
            login,
            schools,
            schools_command,
            users,
            field_activity,
            cookie: CookieSettings::default(),
        }
    }

    /// Replace the session cookie attributes.
    #[must_use]
    pub fn with_cookie_settings(mut self, cookie: CookieSettings) -> Self {
        self.cookie = cookie;
        self
    }
}
