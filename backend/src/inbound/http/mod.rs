//! HTTP inbound adapter exposing REST endpoints.

pub mod access_logs;
pub mod auth;
pub mod error;
pub mod health;
pub mod qr_scans;
pub mod schools;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use crate::domain::ApiResult;

/// Register every handler served under the `/api` scope.
///
/// ```
/// use actix_web::{App, web};
/// use looma_backend::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::json_config())
        .app_data(error::query_config())
        .service(auth::login)
        .service(auth::current_user)
        .service(schools::list_schools)
        .service(schools::create_school)
        .service(schools::get_school)
        .service(schools::update_school)
        .service(schools::delete_school)
        .service(schools::update_school_status)
        .service(users::list_users)
        .service(users::create_user)
        .service(users::get_user)
        .service(users::update_user_role)
        .service(users::delete_user)
        .service(access_logs::list_access_logs)
        .service(access_logs::create_access_log)
        .service(qr_scans::list_qr_scans)
        .service(qr_scans::create_qr_scan);
}
