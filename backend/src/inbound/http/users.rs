//! Account administration handlers. Every route requires an admin session.
//!
//! ```text
//! GET    /api/users
//! POST   /api/users {"username":"sita","email":"sita@looma.org.np","password":"...","role":"staff"}
//! GET    /api/users/{id}
//! PATCH  /api/users/{id} {"role":"admin"}
//! DELETE /api/users/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::Deserialize;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::ports::CreateUserRequest;
use crate::domain::{Capability, Email, Error, Role, User, Username};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schools::SuccessResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, map_user_validation_error, missing_field_error, require_text, user_id_from_path,
};

/// Body of `POST /api/users`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserBody {
    pub username: Option<String>,
    pub email: Option<String>,
    #[schema(format = Password)]
    pub password: Option<String>,
    /// Defaults to `viewer`.
    pub role: Option<String>,
}

impl TryFrom<CreateUserBody> for CreateUserRequest {
    type Error = Error;

    fn try_from(body: CreateUserBody) -> Result<Self, Self::Error> {
        let username = Username::new(body.username.unwrap_or_default())
            .map_err(map_user_validation_error)?;
        let email = Email::new(body.email.unwrap_or_default()).map_err(map_user_validation_error)?;
        let password = body
            .password
            .filter(|password| !password.is_empty())
            .map(Zeroizing::new)
            .ok_or_else(|| missing_field_error(FieldName::new("password")))?;
        let role = body
            .role
            .as_deref()
            .map(parse_role)
            .transpose()?
            .unwrap_or_default();
        Ok(Self {
            username,
            email,
            password,
            role,
        })
    }
}

/// Body of `PATCH /api/users/{id}`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RoleUpdateRequest {
    #[schema(example = "staff")]
    pub role: Option<String>,
}

fn parse_role(raw: &str) -> Result<Role, Error> {
    raw.trim().parse().map_err(map_user_validation_error)
}

#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Accounts ordered by username", body = [User]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    session: SessionContext,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<User>>> {
    session.require(Capability::ManageUsers)?;
    let users = state.users.list().await?;
    Ok(web::Json(users))
}

/// Create an account; the password is hashed before storage.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserBody,
    responses(
        (status = 201, description = "Created", body = User),
        (status = 400, description = "Invalid field", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 409, description = "Username taken", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserBody>,
) -> ApiResult<HttpResponse> {
    session.require(Capability::ManageUsers)?;
    let request = CreateUserRequest::try_from(payload.into_inner())?;
    let user = state.users.create(request).await?;
    Ok(HttpResponse::Created().json(user))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Account", body = User),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    session.require(Capability::ManageUsers)?;
    let id = user_id_from_path(&path)?;
    Ok(web::Json(state.users.get(&id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = RoleUpdateRequest,
    responses(
        (status = 200, description = "Role changed", body = SuccessResponse),
        (status = 400, description = "Missing or unknown role", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUserRole"
)]
#[patch("/users/{id}")]
pub async fn update_user_role(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<RoleUpdateRequest>,
) -> ApiResult<web::Json<SuccessResponse>> {
    session.require(Capability::ManageUsers)?;
    let id = user_id_from_path(&path)?;
    let role = parse_role(&require_text(
        payload.into_inner().role,
        FieldName::new("role"),
    )?)?;
    state.users.update_role(&id, role).await?;
    Ok(SuccessResponse::ok())
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<SuccessResponse>> {
    session.require(Capability::ManageUsers)?;
    let id = user_id_from_path(&path)?;
    state.users.delete(&id).await?;
    Ok(SuccessResponse::ok())
}
