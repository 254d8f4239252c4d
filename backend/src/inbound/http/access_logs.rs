//! Remote access audit trail.
//!
//! ```text
//! GET  /api/access-logs?limit=20
//! POST /api/access-logs {"schoolId":"...","action":"remote_access"}
//! ```

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::AccessLogRequest;
use crate::domain::{
    ACCESS_LOG_DEFAULT_LIMIT, ACCESS_LOG_MAX_LIMIT, AccessLog, Capability, Error, clamp_limit,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_limit, parse_school_id, parse_user_id, require_text,
};

/// `limit` is kept as text so a non-numeric value reports a field error.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LimitQuery {
    /// Page size, clamped into `1..=500`.
    #[param(value_type = Option<u32>)]
    pub limit: Option<String>,
}

/// Body of `POST /api/access-logs`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessLogBody {
    pub school_id: Option<String>,
    #[schema(example = "remote_access")]
    pub action: Option<String>,
    pub details: Option<String>,
    /// Defaults to the signed-in user.
    pub user_id: Option<String>,
    /// Defaults to the signed-in username.
    pub user: Option<String>,
    /// Defaults to the connection's peer address.
    pub ip_address: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/access-logs",
    params(LimitQuery),
    responses(
        (status = 200, description = "Newest first", body = [AccessLog]),
        (status = 400, description = "Non-numeric limit", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["activity"],
    operation_id = "listAccessLogs"
)]
#[get("/access-logs")]
pub async fn list_access_logs(
    session: SessionContext,
    state: web::Data<HttpState>,
    query: web::Query<LimitQuery>,
) -> ApiResult<web::Json<Vec<AccessLog>>> {
    session.require(Capability::ViewDashboard)?;
    let limit = clamp_limit(
        parse_limit(query.limit.as_deref())?,
        ACCESS_LOG_DEFAULT_LIMIT,
        ACCESS_LOG_MAX_LIMIT,
    );
    Ok(web::Json(state.field_activity.recent_access(limit).await?))
}

/// Record an access action against a school. Admin or staff.
#[utoipa::path(
    post,
    path = "/api/access-logs",
    request_body = AccessLogBody,
    responses(
        (status = 201, description = "Recorded", body = AccessLog),
        (status = 400, description = "Missing schoolId or action", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Unknown school", body = Error)
    ),
    tags = ["activity"],
    operation_id = "createAccessLog"
)]
#[post("/access-logs")]
pub async fn create_access_log(
    session: SessionContext,
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: web::Json<AccessLogBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require(Capability::RecordAccess)?;
    let body = payload.into_inner();
    let school_id = parse_school_id(
        &require_text(body.school_id, FieldName::new("schoolId"))?,
        FieldName::new("schoolId"),
    )?;
    let action = require_text(body.action, FieldName::new("action"))?;
    let user_id = match body.user_id.filter(|raw| !raw.trim().is_empty()) {
        Some(raw) => {
            let id = parse_user_id(&raw, FieldName::new("userId"))?;
            state.users.get(&id).await?;
            id
        }
        None => actor.id().clone(),
    };
    let user = body
        .user
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| actor.username().to_string());
    let ip_address = body
        .ip_address
        .or_else(|| req.connection_info().peer_addr().map(str::to_owned));

    let log = state
        .field_activity
        .record_access(AccessLogRequest {
            school_id,
            user_id: Some(user_id),
            user,
            action: action.trim().to_owned(),
            details: body.details,
            ip_address,
        })
        .await?;
    Ok(HttpResponse::Created().json(log))
}
