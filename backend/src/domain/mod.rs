//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed entities of the school monitoring
//! dashboard and the use-case services behind the HTTP adapter. Nothing in
//! this module performs I/O directly; storage is reached through [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - School, SchoolStats, SortState: roster entities and derivations.
//! - User, Role, Capability: accounts and role gating.
//! - Session, SessionToken: server-side login sessions.
//! - AccessLog, QrScan: field activity records.

pub mod access_log;
pub mod auth;
pub mod auth_service;
pub mod bootstrap;
pub mod capability;
pub mod error;
pub mod export;
pub mod field_activity_service;
pub mod password;
pub mod ports;
pub mod qr_scan;
mod repository_errors;
pub mod school;
pub mod school_query;
pub mod school_service;
pub mod session;
pub mod stats;
pub mod trace_id;
pub mod user;
pub mod user_admin_service;

pub use self::access_log::{
    ACCESS_LOG_DEFAULT_LIMIT, ACCESS_LOG_MAX_LIMIT, AccessLog, NewAccessLog, clamp_limit,
};
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::auth_service::SessionLoginService;
pub use self::bootstrap::{BootstrapAdmin, ensure_bootstrap_admin};
pub use self::capability::{Capability, require};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::export::{SCHOOL_CSV_HEADER, schools_to_csv};
pub use self::field_activity_service::FieldActivityService;
pub use self::password::{PasswordHash, PasswordHashError};
pub use self::qr_scan::{NewQrScan, QR_SCAN_DEFAULT_LIMIT, QR_SCAN_MAX_LIMIT, QrScan};
pub use self::school::{
    Contact, LoomaDevice, NewSchool, School, SchoolChanges, SchoolDraft, SchoolId, SchoolStatus,
    SchoolValidationError, card_image, default_school_email,
};
pub use self::school_query::{
    ALL_SENTINEL, SchoolFilter, SortDirection, SortField, SortParseError, SortState,
};
pub use self::school_service::SchoolService;
pub use self::session::{SESSION_COOKIE_NAME, Session, SessionToken, SessionTokenHash};
pub use self::stats::SchoolStats;
pub use self::trace_id::TraceId;
pub use self::user::{
    CredentialedUser, Email, NewUser, Role, User, UserId, UserValidationError, Username,
};
pub use self::user_admin_service::UserAdminService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use looma_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
