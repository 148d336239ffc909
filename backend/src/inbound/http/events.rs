//! Garden event handlers.
//!
//! ```text
//! GET  /api/events    public
//! POST /api/events    committee/manager
//! ```

use actix_web::{get, post, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{authorize, Capability, Error, Event, NewEvent};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{require_text, FieldName};
use crate::inbound::http::ApiResult;

/// Event creation body.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub location: Option<String>,
}

/// List all events.
#[utoipa::path(
    get,
    path = "/api/events",
    responses((status = 200, description = "Events", body = [Event])),
    tags = ["events"],
    operation_id = "listEvents",
    security([])
)]
#[get("/events")]
pub async fn list_events(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Event>>> {
    Ok(web::Json(state.events.list().await?))
}

/// Create an event.
#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Invalid event data", body = Error),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["events"],
    operation_id = "createEvent"
)]
#[post("/events")]
pub async fn create_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateEventRequest>,
) -> ApiResult<HttpResponse> {
    let actor = state.session_user(&session).await?;
    authorize(actor.as_ref(), Capability::CommitteeOrManager)?;
    let actor = actor.ok_or_else(|| Error::unauthorized("login required"))?;

    let payload = payload.into_inner();
    let title = require_text(&payload.title, FieldName::new("title"))?;
    let start_time = require_text(&payload.start_time, FieldName::new("startTime"))?;
    let end_time = require_text(&payload.end_time, FieldName::new("endTime"))?;

    let event = state
        .events
        .create(NewEvent {
            title,
            description: payload.description,
            date: payload.date,
            start_time,
            end_time,
            location: payload.location,
            created_by: actor.id,
        })
        .await?;
    Ok(HttpResponse::Created().json(event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::inbound::http::test_utils::{login_as, seed_user, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::json;

    #[actix_web::test]
    async fn only_elevated_roles_create_events() {
        let (app, store) = test_app().await;
        seed_user(&store, "ada", "ada@example.org", Role::Gardener).await;
        seed_user(&store, "casey", "casey@example.org", Role::Committee).await;

        let body = json!({
            "title": "Harvest Festival",
            "date": "2026-09-19T12:00:00Z",
            "startTime": "12:00 PM",
            "endTime": "4:00 PM",
            "location": "Main lawn"
        });

        let gardener = login_as(&app, "ada").await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/events")
                .cookie(gardener)
                .set_json(&body)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let committee = login_as(&app, "casey").await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/events")
                .cookie(committee)
                .set_json(&body)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }
}
