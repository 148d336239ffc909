//! Work day scheduling handlers.
//!
//! ```text
//! GET  /api/workdays
//! GET  /api/workdays/{id}
//! GET  /api/workdays/{id}/attendances
//! POST /api/workdays                                 committee/manager
//! POST /api/workdays/{id}/attend                     authenticated
//! PUT  /api/workdays/{workDayId}/attendances/{id}    committee/manager
//! ```

use actix_web::{get, post, put, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::{
    authorize, AttendanceStatus, Capability, Error, GardenEvent, NewWorkDay, WorkDay,
    WorkDayAttendance,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{require_text, FieldName};
use crate::inbound::http::ApiResult;

/// Work day creation body.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkDayRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub max_attendees: Option<i32>,
}

/// Attendance status update body.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttendanceRequest {
    pub status: AttendanceStatus,
}

/// List all work days.
#[utoipa::path(
    get,
    path = "/api/workdays",
    responses((status = 200, description = "Work days", body = [WorkDay])),
    tags = ["workdays"],
    operation_id = "listWorkDays",
    security([])
)]
#[get("/workdays")]
pub async fn list_work_days(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<WorkDay>>> {
    Ok(web::Json(state.work_days.list().await?))
}

/// Fetch one work day.
#[utoipa::path(
    get,
    path = "/api/workdays/{id}",
    params(("id" = i32, Path, description = "Work day id")),
    responses(
        (status = 200, description = "Work day", body = WorkDay),
        (status = 404, description = "Work day not found", body = Error)
    ),
    tags = ["workdays"],
    operation_id = "getWorkDay",
    security([])
)]
#[get("/workdays/{id}")]
pub async fn get_work_day(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<WorkDay>> {
    let work_day = state
        .work_days
        .find(path.into_inner())
        .await?
        .ok_or_else(|| Error::not_found("work day not found"))?;
    Ok(web::Json(work_day))
}

/// Attendance records for a work day.
#[utoipa::path(
    get,
    path = "/api/workdays/{id}/attendances",
    params(("id" = i32, Path, description = "Work day id")),
    responses((status = 200, description = "Attendance records", body = [WorkDayAttendance])),
    tags = ["workdays"],
    operation_id = "listAttendances",
    security([])
)]
#[get("/workdays/{id}/attendances")]
pub async fn list_attendances(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Vec<WorkDayAttendance>>> {
    Ok(web::Json(
        state.work_days.attendances_for(path.into_inner()).await?,
    ))
}

/// Schedule a work day and announce it to every member.
///
/// The announcement (global notification plus broadcast email) is a
/// best-effort side effect; its failure never fails the scheduling.
#[utoipa::path(
    post,
    path = "/api/workdays",
    request_body = CreateWorkDayRequest,
    responses(
        (status = 201, description = "Work day created", body = WorkDay),
        (status = 400, description = "Invalid work day data", body = Error),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["workdays"],
    operation_id = "createWorkDay"
)]
#[post("/workdays")]
pub async fn create_work_day(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateWorkDayRequest>,
) -> ApiResult<HttpResponse> {
    let actor = state.session_user(&session).await?;
    authorize(actor.as_ref(), Capability::CommitteeOrManager)?;
    let actor = actor.ok_or_else(|| Error::unauthorized("login required"))?;

    let payload = payload.into_inner();
    let title = require_text(&payload.title, FieldName::new("title"))?;
    let start_time = require_text(&payload.start_time, FieldName::new("startTime"))?;
    let end_time = require_text(&payload.end_time, FieldName::new("endTime"))?;

    let work_day = state
        .work_days
        .create(NewWorkDay {
            title,
            description: payload.description,
            date: payload.date,
            start_time,
            end_time,
            max_attendees: payload.max_attendees,
            created_by: actor.id,
        })
        .await?;

    if let Err(err) = state
        .notifier
        .publish(GardenEvent::WorkDayScheduled {
            work_day: work_day.clone(),
        })
        .await
    {
        warn!(error = %err, work_day = work_day.id, "work day announcement failed");
    }

    Ok(HttpResponse::Created().json(work_day))
}

/// Sign the session user up for a work day, once.
#[utoipa::path(
    post,
    path = "/api/workdays/{id}/attend",
    params(("id" = i32, Path, description = "Work day id")),
    responses(
        (status = 201, description = "Signed up", body = WorkDayAttendance),
        (status = 400, description = "Already signed up", body = Error),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 404, description = "Work day not found", body = Error)
    ),
    tags = ["workdays"],
    operation_id = "attendWorkDay"
)]
#[post("/workdays/{id}/attend")]
pub async fn attend_work_day(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let actor = state.require_session_user(&session).await?;
    let work_day_id = path.into_inner();

    state
        .work_days
        .find(work_day_id)
        .await?
        .ok_or_else(|| Error::not_found("work day not found"))?;

    let already_signed_up = state
        .work_days
        .attendances_for_user(actor.id)
        .await?
        .iter()
        .any(|attendance| attendance.work_day_id == work_day_id);
    if already_signed_up {
        return Err(Error::invalid_request("already signed up for this work day"));
    }

    let attendance = state
        .work_days
        .create_attendance(work_day_id, actor.id)
        .await?;
    Ok(HttpResponse::Created().json(attendance))
}

/// Update an attendance record's status (attended / missed).
#[utoipa::path(
    put,
    path = "/api/workdays/{work_day_id}/attendances/{id}",
    request_body = UpdateAttendanceRequest,
    params(
        ("work_day_id" = i32, Path, description = "Work day id"),
        ("id" = i32, Path, description = "Attendance id")
    ),
    responses(
        (status = 200, description = "Updated attendance", body = WorkDayAttendance),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Attendance record not found", body = Error)
    ),
    tags = ["workdays"],
    operation_id = "updateAttendance"
)]
#[put("/workdays/{work_day_id}/attendances/{id}")]
pub async fn update_attendance(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(i32, i32)>,
    payload: web::Json<UpdateAttendanceRequest>,
) -> ApiResult<web::Json<WorkDayAttendance>> {
    let actor = state.session_user(&session).await?;
    authorize(actor.as_ref(), Capability::CommitteeOrManager)?;

    let (_work_day_id, attendance_id) = path.into_inner();
    let updated = state
        .work_days
        .update_attendance_status(attendance_id, payload.status)
        .await?
        .ok_or_else(|| Error::not_found("attendance record not found"))?;
    Ok(web::Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::NotificationRepository;
    use crate::domain::Role;
    use crate::inbound::http::test_utils::{login_as, seed_user, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{json, Value};

    fn work_day_body() -> Value {
        json!({
            "title": "Spring Clean-up",
            "description": "Bring gloves.",
            "date": "2026-04-22T09:00:00Z",
            "startTime": "9:00 AM",
            "endTime": "1:00 PM",
            "maxAttendees": 40
        })
    }

    #[actix_web::test]
    async fn scheduling_announces_a_global_notification() {
        let (app, store) = test_app().await;
        seed_user(&store, "casey", "casey@example.org", Role::Committee).await;
        let gardener = seed_user(&store, "ada", "ada@example.org", Role::Gardener).await;

        let cookie = login_as(&app, "casey").await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/workdays")
                .cookie(cookie)
                .set_json(work_day_body())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);

        // Visible to an unrelated gardener because it is global.
        let visible = NotificationRepository::list_for_user(&*store, gardener.id)
            .await
            .expect("notifications");
        assert_eq!(visible.len(), 1);
        assert!(visible[0].is_global);
        assert!(visible[0].message.contains("Spring Clean-up"));
    }

    #[actix_web::test]
    async fn signing_up_twice_is_rejected() {
        let (app, store) = test_app().await;
        seed_user(&store, "casey", "casey@example.org", Role::Committee).await;
        seed_user(&store, "ada", "ada@example.org", Role::Gardener).await;

        let committee = login_as(&app, "casey").await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/workdays")
                .cookie(committee)
                .set_json(work_day_body())
                .to_request(),
        )
        .await;
        let created: Value = test::read_body_json(res).await;
        let id = created.get("id").and_then(Value::as_i64).expect("id");

        let gardener = login_as(&app, "ada").await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/workdays/{id}/attend"))
                .cookie(gardener.clone())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/workdays/{id}/attend"))
                .cookie(gardener)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn gardeners_cannot_schedule_work_days() {
        let (app, store) = test_app().await;
        seed_user(&store, "ada", "ada@example.org", Role::Gardener).await;
        let cookie = login_as(&app, "ada").await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/workdays")
                .cookie(cookie)
                .set_json(work_day_body())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }
}
