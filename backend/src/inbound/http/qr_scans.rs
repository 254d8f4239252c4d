//! QR scans recorded by staff on site visits.

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::ports::QrScanRequest;
use crate::domain::{
    Capability, Error, QR_SCAN_DEFAULT_LIMIT, QR_SCAN_MAX_LIMIT, QrScan, clamp_limit,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::access_logs::LimitQuery;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_limit, parse_school_id, require_text};

/// Body of `POST /api/qr-scans`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QrScanBody {
    pub school_id: Option<String>,
    #[schema(example = "LMA-482913")]
    pub looma_id: Option<String>,
    /// Defaults to the signed-in username.
    pub staff_name: Option<String>,
    pub notes: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/qr-scans",
    params(LimitQuery),
    responses(
        (status = 200, description = "Newest first", body = [QrScan]),
        (status = 400, description = "Non-numeric limit", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["activity"],
    operation_id = "listQrScans"
)]
#[get("/qr-scans")]
pub async fn list_qr_scans(
    session: SessionContext,
    state: web::Data<HttpState>,
    query: web::Query<LimitQuery>,
) -> ApiResult<web::Json<Vec<QrScan>>> {
    session.require(Capability::ViewDashboard)?;
    let limit = clamp_limit(
        parse_limit(query.limit.as_deref())?,
        QR_SCAN_DEFAULT_LIMIT,
        QR_SCAN_MAX_LIMIT,
    );
    Ok(web::Json(state.field_activity.recent_scans(limit).await?))
}

#[utoipa::path(
    post,
    path = "/api/qr-scans",
    request_body = QrScanBody,
    responses(
        (status = 201, description = "Recorded", body = QrScan),
        (status = 400, description = "Missing schoolId or loomaId", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Unknown school", body = Error)
    ),
    tags = ["activity"],
    operation_id = "createQrScan"
)]
#[post("/qr-scans")]
pub async fn create_qr_scan(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<QrScanBody>,
) -> ApiResult<HttpResponse> {
    let staff = session.require(Capability::RecordQrScan)?;
    let QrScanBody {
        school_id,
        looma_id,
        staff_name,
        notes,
    } = payload.into_inner();
    let school_id = parse_school_id(
        &require_text(school_id, FieldName::new("schoolId"))?,
        FieldName::new("schoolId"),
    )?;
    let looma_id = require_text(looma_id, FieldName::new("loomaId"))?;
    let staff_name = staff_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| staff.username().to_string());

    let scan = state
        .field_activity
        .record_scan(QrScanRequest {
            school_id,
            looma_id: looma_id.trim().to_owned(),
            staff_name,
            notes,
        })
        .await?;
    Ok(HttpResponse::Created().json(scan))
}
