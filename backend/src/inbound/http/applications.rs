//! Application workflow handlers.
//!
//! ```text
//! GET  /api/applications        owner scope; committee/manager see all
//! GET  /api/applications/{id}   owner or committee/manager
//! POST /api/applications        submit
//! PUT  /api/applications/{id}   {"action":"approve"|"reject"|"revoke", "note": ...}
//! ```

use actix_web::{get, post, put, web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::applications::SubmitApplication;
use crate::domain::{authorize, Application, Capability, Error, GardenerType};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Submission request body.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitApplicationRequest {
    pub gardener_type: GardenerType,
    #[serde(default)]
    pub preferred_area: Option<String>,
    #[serde(default)]
    pub requested_plot_id: Option<i32>,
    #[serde(default)]
    pub special_requests: Option<String>,
    #[serde(default)]
    pub gardening_experience: Option<String>,
}

/// Review action applied through `PUT /api/applications/{id}`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ApplicationActionRequest {
    /// Approve and bind a plot. Committee or manager.
    Approve {
        #[serde(default)]
        note: Option<String>,
    },
    /// Reject with a mandatory reason. Committee or manager.
    Reject {
        #[serde(default)]
        note: Option<String>,
    },
    /// Collapse an approval back into rejected. Manager only.
    Revoke,
}

/// Applications visible to the caller.
#[utoipa::path(
    get,
    path = "/api/applications",
    responses(
        (status = 200, description = "Applications", body = [Application]),
        (status = 401, description = "Unauthenticated", body = Error)
    ),
    tags = ["applications"],
    operation_id = "listApplications"
)]
#[get("/applications")]
pub async fn list_applications(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Application>>> {
    let actor = state.require_session_user(&session).await?;
    Ok(web::Json(state.applications.list_for(&actor).await?))
}

/// Fetch one application, enforcing owner-or-elevated visibility.
#[utoipa::path(
    get,
    path = "/api/applications/{id}",
    params(("id" = i32, Path, description = "Application id")),
    responses(
        (status = 200, description = "Application", body = Application),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Application not found", body = Error)
    ),
    tags = ["applications"],
    operation_id = "getApplication"
)]
#[get("/applications/{id}")]
pub async fn get_application(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Application>> {
    let actor = state.require_session_user(&session).await?;
    Ok(web::Json(
        state.applications.get_for(&actor, path.into_inner()).await?,
    ))
}

/// Submit an application for the session user.
#[utoipa::path(
    post,
    path = "/api/applications",
    request_body = SubmitApplicationRequest,
    responses(
        (status = 201, description = "Application created", body = Application),
        (status = 400, description = "Invalid application data", body = Error),
        (status = 401, description = "Unauthenticated", body = Error)
    ),
    tags = ["applications"],
    operation_id = "submitApplication"
)]
#[post("/applications")]
pub async fn submit_application(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SubmitApplicationRequest>,
) -> ApiResult<HttpResponse> {
    let actor = state.require_session_user(&session).await?;
    let payload = payload.into_inner();
    let application = state
        .applications
        .submit(
            &actor,
            SubmitApplication {
                gardener_type: payload.gardener_type,
                preferred_area: payload.preferred_area,
                requested_plot_id: payload.requested_plot_id,
                special_requests: payload.special_requests,
                gardening_experience: payload.gardening_experience,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(application))
}

/// Apply a review action to an application.
#[utoipa::path(
    put,
    path = "/api/applications/{id}",
    request_body = ApplicationActionRequest,
    params(("id" = i32, Path, description = "Application id")),
    responses(
        (status = 200, description = "Processed application", body = Application),
        (status = 400, description = "Invalid transition or missing reason", body = Error),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Application not found", body = Error),
        (status = 409, description = "No plot available", body = Error)
    ),
    tags = ["applications"],
    operation_id = "processApplication"
)]
#[put("/applications/{id}")]
pub async fn process_application(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
    payload: web::Json<ApplicationActionRequest>,
) -> ApiResult<web::Json<Application>> {
    let actor = state.session_user(&session).await?;
    let id = path.into_inner();

    let processed = match payload.into_inner() {
        ApplicationActionRequest::Approve { note } => {
            authorize(actor.as_ref(), Capability::CommitteeOrManager)?;
            let actor = actor.ok_or_else(|| Error::unauthorized("login required"))?;
            state.applications.approve(&actor, id, note).await?
        }
        ApplicationActionRequest::Reject { note } => {
            authorize(actor.as_ref(), Capability::CommitteeOrManager)?;
            let actor = actor.ok_or_else(|| Error::unauthorized("login required"))?;
            state
                .applications
                .reject(&actor, id, note.as_deref().unwrap_or_default())
                .await?
        }
        ApplicationActionRequest::Revoke => {
            authorize(actor.as_ref(), Capability::ManagerOnly)?;
            let actor = actor.ok_or_else(|| Error::unauthorized("login required"))?;
            state.applications.revoke(&actor, id).await?
        }
    };
    Ok(web::Json(processed))
}
