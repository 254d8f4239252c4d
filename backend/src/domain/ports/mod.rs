//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod access_log_repository;
mod field_activity;
mod login_service;
mod qr_scan_repository;
mod school_repository;
mod schools;
mod session_repository;
mod user_administration;
mod user_repository;

#[cfg(test)]
pub use access_log_repository::MockAccessLogRepository;
pub use access_log_repository::{AccessLogRepository, AccessLogRepositoryError};
#[cfg(test)]
pub use field_activity::MockFieldActivity;
pub use field_activity::{AccessLogRequest, FieldActivity, QrScanRequest};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{AuthenticatedSession, LoginService};
#[cfg(test)]
pub use qr_scan_repository::MockQrScanRepository;
pub use qr_scan_repository::{QrScanRepository, QrScanRepositoryError};
#[cfg(test)]
pub use school_repository::MockSchoolRepository;
pub use school_repository::{SchoolRepository, SchoolRepositoryError};
#[cfg(test)]
pub use schools::{MockSchoolsCommand, MockSchoolsQuery};
pub use schools::{SchoolsCommand, SchoolsQuery};
#[cfg(test)]
pub use session_repository::MockSessionRepository;
pub use session_repository::{SessionRepository, SessionRepositoryError};
#[cfg(test)]
pub use user_administration::MockUserAdministration;
pub use user_administration::{CreateUserRequest, UserAdministration};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
