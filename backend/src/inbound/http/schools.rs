//! School roster handlers.
//!
//! ```text
//! GET    /api/schools?search=pokhara&status=online&sort=district&order=desc
//! GET    /api/schools?stats=true
//! POST   /api/schools {"name":"...","province":"Gandaki","district":"Kaski"}
//! GET    /api/schools/{id}
//! PUT    /api/schools/{id} {"headmaster":"..."}
//! DELETE /api/schools/{id}
//! PATCH  /api/schools/{id}/status {"status":"maintenance"}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    ALL_SENTINEL, Capability, Error, School, SchoolChanges, SchoolDraft, SchoolFilter,
    SchoolStats, SchoolStatus, SortDirection, SortField, SortState,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, map_school_validation_error, require_text,
    school_id_from_path,
};

/// Query parameters accepted by `GET /api/schools`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SchoolListQuery {
    /// Case-insensitive substring over name, district, palika and Looma id.
    pub search: Option<String>,
    /// `online`, `offline`, `maintenance` or `all`.
    pub status: Option<String>,
    /// Exact province, or `all`.
    pub province: Option<String>,
    /// `name`, `district`, `province`, `status` or `lastSeen`.
    pub sort: Option<String>,
    /// `asc` or `desc`.
    pub order: Option<String>,
    /// `true` returns status counts instead of the list.
    pub stats: Option<String>,
}

/// A school as returned by the API, with its card image.
#[derive(Debug, Serialize, ToSchema)]
pub struct SchoolResponse {
    #[serde(flatten)]
    pub school: School,
    #[schema(example = "/schools/school-3.jpg")]
    pub image: String,
}

impl From<School> for SchoolResponse {
    fn from(school: School) -> Self {
        let image = school.card_image();
        Self { school, image }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SchoolListResponse {
    pub schools: Vec<SchoolResponse>,
    pub total: usize,
}

/// `{ "school": School }`
#[derive(Debug, Serialize, ToSchema)]
pub struct SchoolEnvelope {
    pub school: SchoolResponse,
}

/// Nested contact block; flat `email`/`phone`/`headmaster` are also read.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactInput {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub headmaster: Option<String>,
}

/// Body of `POST /api/schools` and `PUT /api/schools/{id}`.
///
/// Creation requires `name`, `province` and `district` and ignores `status`;
/// updates apply only the fields present and ignore `serialNumber`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchoolRequest {
    pub name: Option<String>,
    pub province: Option<String>,
    pub district: Option<String>,
    pub palika: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub contact: Option<ContactInput>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub headmaster: Option<String>,
    pub status: Option<String>,
    pub looma_id: Option<String>,
    pub serial_number: Option<String>,
    pub looma_count: Option<i32>,
}

impl SchoolRequest {
    /// Merge nested and flat contact fields; the nested value wins.
    fn take_contact(&mut self) -> ContactInput {
        let nested = self.contact.take().unwrap_or_default();
        ContactInput {
            email: nested.email.or_else(|| self.email.take()),
            phone: nested.phone.or_else(|| self.phone.take()),
            headmaster: nested.headmaster.or_else(|| self.headmaster.take()),
        }
    }

    fn into_draft(mut self) -> Result<SchoolDraft, Error> {
        let contact = self.take_contact();
        let mut draft = SchoolDraft::new(
            self.name.as_deref().unwrap_or_default(),
            self.province.as_deref().unwrap_or_default(),
            self.district.as_deref().unwrap_or_default(),
        )
        .and_then(|draft| draft.with_coordinates(self.latitude, self.longitude))
        .and_then(|draft| draft.with_looma_count(self.looma_count))
        .map_err(map_school_validation_error)?;
        draft.palika = self.palika;
        draft.email = contact.email;
        draft.phone = contact.phone;
        draft.headmaster = contact.headmaster;
        draft.looma_id = self.looma_id;
        draft.serial_number = self.serial_number;
        Ok(draft)
    }

    fn into_changes(mut self) -> Result<SchoolChanges, Error> {
        let contact = self.take_contact();
        SchoolChanges {
            name: self.name,
            latitude: self.latitude,
            longitude: self.longitude,
            email: contact.email,
            phone: contact.phone,
            headmaster: contact.headmaster,
            province: self.province,
            district: self.district,
            palika: self.palika,
            status: parse_optional_status(self.status.as_deref())?,
            looma_id: self.looma_id,
            looma_count: self.looma_count,
        }
        .validated()
        .map_err(map_school_validation_error)
    }
}

/// Body of `PATCH /api/schools/{id}/status`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StatusUpdateRequest {
    #[schema(example = "maintenance")]
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> web::Json<Self> {
        web::Json(Self { success: true })
    }
}

fn parse_status(raw: &str) -> Result<SchoolStatus, Error> {
    raw.parse().map_err(map_school_validation_error)
}

fn parse_optional_status(raw: Option<&str>) -> Result<Option<SchoolStatus>, Error> {
    raw.map(parse_status).transpose()
}

/// `status` filter; blank and `all` mean no filter.
fn status_filter(raw: Option<&str>) -> Result<Option<SchoolStatus>, Error> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) if value == ALL_SENTINEL => Ok(None),
        Some(value) => parse_status(value).map(Some),
    }
}

/// Sort requested by `sort`/`order`; `order` alone applies to `name`.
fn sort_state(sort: Option<&str>, order: Option<&str>) -> Result<Option<SortState>, Error> {
    let sort = sort.map(str::trim).filter(|value| !value.is_empty());
    let order = order.map(str::trim).filter(|value| !value.is_empty());
    if sort.is_none() && order.is_none() {
        return Ok(None);
    }
    let field = sort
        .map(|value| {
            value
                .parse::<SortField>()
                .map_err(|err| invalid_value_error(FieldName::new("sort"), value, err.to_string()))
        })
        .transpose()?
        .unwrap_or(SortField::Name);
    let direction = order
        .map(|value| {
            value
                .parse::<SortDirection>()
                .map_err(|err| invalid_value_error(FieldName::new("order"), value, err.to_string()))
        })
        .transpose()?
        .unwrap_or_default();
    Ok(Some(SortState::new(field, direction)))
}

/// List schools, or their status counts when `stats=true`.
#[utoipa::path(
    get,
    path = "/api/schools",
    params(SchoolListQuery),
    responses(
        (status = 200, description = "Filtered schools, or SchoolStats when stats=true", body = SchoolListResponse),
        (status = 400, description = "Unknown status, sort field or order", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["schools"],
    operation_id = "listSchools"
)]
#[get("/schools")]
pub async fn list_schools(
    session: SessionContext,
    state: web::Data<HttpState>,
    query: web::Query<SchoolListQuery>,
) -> ApiResult<HttpResponse> {
    session.require(Capability::ViewDashboard)?;
    let SchoolListQuery {
        search,
        status,
        province,
        sort,
        order,
        stats,
    } = query.into_inner();

    if stats.as_deref() == Some("true") {
        let stats: SchoolStats = state.schools.stats().await?;
        return Ok(HttpResponse::Ok().json(stats));
    }

    let filter = SchoolFilter::new(search, status_filter(status.as_deref())?, province);
    let sort = sort_state(sort.as_deref(), order.as_deref())?;
    let schools = state.schools.list(filter, sort).await?;
    let total = schools.len();
    Ok(HttpResponse::Ok().json(SchoolListResponse {
        schools: schools.into_iter().map(SchoolResponse::from).collect(),
        total,
    }))
}

/// Register a school. Admin only.
#[utoipa::path(
    post,
    path = "/api/schools",
    request_body = SchoolRequest,
    responses(
        (status = 201, description = "Created", body = SchoolEnvelope),
        (status = 400, description = "Missing name, province or district", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["schools"],
    operation_id = "createSchool"
)]
#[post("/schools")]
pub async fn create_school(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<SchoolRequest>,
) -> ApiResult<HttpResponse> {
    session.require(Capability::ManageSchools)?;
    let draft = payload.into_inner().into_draft()?;
    let school = state.schools_command.create(draft).await?;
    Ok(HttpResponse::Created().json(SchoolEnvelope {
        school: school.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/schools/{id}",
    params(("id" = String, Path, description = "School id")),
    responses(
        (status = 200, description = "School", body = SchoolResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["schools"],
    operation_id = "getSchool"
)]
#[get("/schools/{id}")]
pub async fn get_school(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<SchoolResponse>> {
    session.require(Capability::ViewDashboard)?;
    let id = school_id_from_path(&path)?;
    let school = state.schools.get(&id).await?;
    Ok(web::Json(school.into()))
}

/// Apply a partial update. Admin only.
#[utoipa::path(
    put,
    path = "/api/schools/{id}",
    params(("id" = String, Path, description = "School id")),
    request_body = SchoolRequest,
    responses(
        (status = 200, description = "Updated school", body = SchoolResponse),
        (status = 400, description = "Invalid field value", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["schools"],
    operation_id = "updateSchool"
)]
#[put("/schools/{id}")]
pub async fn update_school(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<SchoolRequest>,
) -> ApiResult<web::Json<SchoolResponse>> {
    session.require(Capability::ManageSchools)?;
    let id = school_id_from_path(&path)?;
    let changes = payload.into_inner().into_changes()?;
    let school = state.schools_command.update(&id, changes).await?;
    Ok(web::Json(school.into()))
}

/// Remove a school. Its access logs and scans are kept. Admin only.
#[utoipa::path(
    delete,
    path = "/api/schools/{id}",
    params(("id" = String, Path, description = "School id")),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["schools"],
    operation_id = "deleteSchool"
)]
#[delete("/schools/{id}")]
pub async fn delete_school(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<SuccessResponse>> {
    session.require(Capability::ManageSchools)?;
    let id = school_id_from_path(&path)?;
    state.schools_command.delete(&id).await?;
    Ok(SuccessResponse::ok())
}

/// Change only the connectivity status. Admin or staff.
#[utoipa::path(
    patch,
    path = "/api/schools/{id}/status",
    params(("id" = String, Path, description = "School id")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Status changed", body = SuccessResponse),
        (status = 400, description = "Missing or unknown status", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["schools"],
    operation_id = "updateSchoolStatus"
)]
#[patch("/schools/{id}/status")]
pub async fn update_school_status(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<StatusUpdateRequest>,
) -> ApiResult<web::Json<SuccessResponse>> {
    session.require(Capability::UpdateSchoolStatus)?;
    let id = school_id_from_path(&path)?;
    let raw = require_text(payload.into_inner().status, FieldName::new("status"))?;
    let status = parse_status(raw.trim())?;
    state.schools_command.update_status(&id, status).await?;
    Ok(SuccessResponse::ok())
}

#[cfg(test)]
#[path = "schools_tests.rs"]
mod tests;
