//! OpenAPI document for the dashboard API.
//!
//! Served by Swagger UI in debug builds and printed by the `openapi-dump`
//! binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    AccessLog, Contact, Error, ErrorCode, LoomaDevice, QrScan, Role, SESSION_COOKIE_NAME,
    SchoolStats, SchoolStatus, SortDirection, SortField, User,
};
use crate::inbound::http::access_logs::AccessLogBody;
use crate::inbound::http::auth::{LoginRequest, UserEnvelope};
use crate::inbound::http::qr_scans::QrScanBody;
use crate::inbound::http::schools::{
    ContactInput, SchoolEnvelope, SchoolListResponse, SchoolRequest, SchoolResponse,
    StatusUpdateRequest, SuccessResponse,
};
use crate::inbound::http::users::{CreateUserBody, RoleUpdateRequest};

/// Registers the `session_token` cookie scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE_NAME,
                "Session cookie issued by POST /api/auth/login.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Looma dashboard API",
        description = "School and device monitoring for the Looma deployment in Nepal."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::current_user,
        crate::inbound::http::schools::list_schools,
        crate::inbound::http::schools::create_school,
        crate::inbound::http::schools::get_school,
        crate::inbound::http::schools::update_school,
        crate::inbound::http::schools::delete_school,
        crate::inbound::http::schools::update_school_status,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user_role,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::access_logs::list_access_logs,
        crate::inbound::http::access_logs::create_access_log,
        crate::inbound::http::qr_scans::list_qr_scans,
        crate::inbound::http::qr_scans::create_qr_scan,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        Role,
        UserEnvelope,
        LoginRequest,
        SchoolResponse,
        SchoolEnvelope,
        SchoolListResponse,
        SchoolRequest,
        ContactInput,
        Contact,
        LoomaDevice,
        SchoolStatus,
        SchoolStats,
        SortField,
        SortDirection,
        StatusUpdateRequest,
        SuccessResponse,
        CreateUserBody,
        RoleUpdateRequest,
        AccessLog,
        AccessLogBody,
        QrScan,
        QrScanBody,
    )),
    tags(
        (name = "auth", description = "Sign-in and the current session"),
        (name = "schools", description = "School roster, filters and status"),
        (name = "users", description = "Account administration"),
        (name = "activity", description = "Access logs and QR scans"),
        (name = "health", description = "Probes for orchestration")
    )
)]
pub struct ApiDoc;
