//! User registration and management handlers.
//!
//! ```text
//! POST /api/users         public registration (always a gardener)
//! GET  /api/users         committee/manager
//! PUT  /api/users/{id}    manager
//! ```

use actix_web::{get, post, put, web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{authorize, Capability, Error, NewUser, Role, User, UserPatch};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{require_text, FieldName};
use crate::inbound::http::ApiResult;

/// Registration request body.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Register a new member.
///
/// Public registration always creates a `gardener`; role changes are a
/// manager-only user-management write. Username and email uniqueness are
/// pre-checked against the store.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid or duplicate registration", body = Error)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let username = require_text(&payload.username, FieldName::new("username"))?;
    require_text(&payload.password, FieldName::new("password"))?;
    let email = require_text(&payload.email, FieldName::new("email"))?;
    let first_name = require_text(&payload.first_name, FieldName::new("firstName"))?;
    let last_name = require_text(&payload.last_name, FieldName::new("lastName"))?;

    if state.users.find_by_username(&username).await?.is_some() {
        return Err(Error::invalid_request("username already taken"));
    }
    if state.users.find_by_email(&email).await?.is_some() {
        return Err(Error::invalid_request("email already registered"));
    }

    let user = state
        .users
        .create(NewUser {
            username,
            password: payload.password,
            email,
            first_name,
            last_name,
            phone: payload.phone,
            address: payload.address,
            role: Role::Gardener,
        })
        .await?;
    Ok(HttpResponse::Created().json(user))
}

/// List all members.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users", body = [User]),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<User>>> {
    let actor = state.session_user(&session).await?;
    authorize(actor.as_ref(), Capability::CommitteeOrManager)?;
    Ok(web::Json(state.users.list().await?))
}

/// User-management update body; absent fields are untouched.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, with = "crate::domain::double_option")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    #[serde(default, with = "crate::domain::double_option")]
    #[schema(value_type = Option<String>)]
    pub address: Option<Option<String>>,
    pub role: Option<Role>,
}

/// Update a member record, including role changes.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    request_body = UserUpdateRequest,
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Invalid update", body = Error),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
    payload: web::Json<UserUpdateRequest>,
) -> ApiResult<web::Json<User>> {
    let actor = state.session_user(&session).await?;
    authorize(actor.as_ref(), Capability::ManagerOnly)?;

    let id = path.into_inner();
    let payload = payload.into_inner();

    if let Some(email) = &payload.email {
        if let Some(existing) = state.users.find_by_email(email).await? {
            if existing.id != id {
                return Err(Error::invalid_request("email already registered"));
            }
        }
    }

    let updated = state
        .users
        .update(
            id,
            UserPatch {
                email: payload.email,
                first_name: payload.first_name,
                last_name: payload.last_name,
                phone: payload.phone,
                address: payload.address,
                role: payload.role,
            },
        )
        .await?
        .ok_or_else(|| Error::not_found("user not found"))?;
    Ok(web::Json(updated))
}
