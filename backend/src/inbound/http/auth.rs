//! Authentication handlers.
//!
//! ```text
//! POST /api/auth/login  {"username":"maria","password":"..."}
//! POST /api/auth/logout
//! GET  /api/auth/user
//! ```

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, User};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{require_text, FieldName};
use crate::inbound::http::ApiResult;

/// Login request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Authenticate credentials and establish a session.
///
/// Credential storage mechanics are out of scope here; the check is a
/// straight comparison against the stored value, and both unknown-user and
/// wrong-password failures produce the same response.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<User>> {
    let payload = payload.into_inner();
    let username = require_text(&payload.username, FieldName::new("username"))?;
    require_text(&payload.password, FieldName::new("password"))?;

    let user = state
        .users
        .find_by_username(&username)
        .await?
        .filter(|user| user.password == payload.password)
        .ok_or_else(|| Error::unauthorized("invalid username or password"))?;

    session.persist_user(user.id)?;
    Ok(web::Json(user))
}

/// Clear the session.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Logged out")),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::Ok().json(serde_json::json!({ "message": "Logged out successfully" }))
}

/// The current session user, or 401 when unauthenticated.
#[utoipa::path(
    get,
    path = "/api/auth/user",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not authenticated", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/user")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<User>> {
    let user = state.require_session_user(&session).await?;
    Ok(web::Json(user))
}
