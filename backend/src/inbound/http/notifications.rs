//! Notification inbox handlers.
//!
//! ```text
//! GET    /api/notifications               authenticated, own plus global
//! GET    /api/notifications/unread/count  authenticated
//! POST   /api/notifications               authenticated; global needs committee/manager
//! PATCH  /api/notifications/{id}/read     authenticated
//! PATCH  /api/notifications/read-all      authenticated, idempotent
//! DELETE /api/notifications/{id}          authenticated, hard delete
//! ```

use actix_web::{delete, get, patch, post, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    authorize, Capability, Error, NewNotification, Notification, NotificationKind,
    NotificationPriority,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{require_text, FieldName};
use crate::inbound::http::ApiResult;

/// Notification creation body.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(default = "default_priority")]
    pub priority: NotificationPriority,
    #[serde(default)]
    pub user_id: Option<i32>,
    #[serde(default)]
    pub is_global: bool,
    #[serde(default)]
    pub related_entity_type: Option<String>,
    #[serde(default)]
    pub related_entity_id: Option<i32>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub action_link: Option<String>,
}

fn default_priority() -> NotificationPriority {
    NotificationPriority::Medium
}

/// Unread-count response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct UnreadCount {
    pub count: usize,
}

/// Notifications visible to the session user, newest first.
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Notifications", body = [Notification]),
        (status = 401, description = "Unauthenticated", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications"
)]
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Notification>>> {
    let actor = state.require_session_user(&session).await?;
    Ok(web::Json(state.notifications.list_for_user(actor.id).await?))
}

/// Count of unread notifications visible to the session user.
#[utoipa::path(
    get,
    path = "/api/notifications/unread/count",
    responses(
        (status = 200, description = "Unread count", body = UnreadCount),
        (status = 401, description = "Unauthenticated", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "unreadNotificationCount"
)]
#[get("/notifications/unread/count")]
pub async fn unread_count(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UnreadCount>> {
    let actor = state.require_session_user(&session).await?;
    let count = state.notifications.unread_count_for_user(actor.id).await?;
    Ok(web::Json(UnreadCount { count }))
}

/// Create a notification. Global records are restricted to committee and
/// managers; high/urgent per-user records trigger a best-effort email.
#[utoipa::path(
    post,
    path = "/api/notifications",
    request_body = CreateNotificationRequest,
    responses(
        (status = 201, description = "Notification created", body = Notification),
        (status = 400, description = "Invalid notification data", body = Error),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "createNotification"
)]
#[post("/notifications")]
pub async fn create_notification(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateNotificationRequest>,
) -> ApiResult<HttpResponse> {
    let actor = state.require_session_user(&session).await?;
    let payload = payload.into_inner();
    let title = require_text(&payload.title, FieldName::new("title"))?;
    let message = require_text(&payload.message, FieldName::new("message"))?;

    if payload.is_global {
        authorize(Some(&actor), Capability::CommitteeOrManager).map_err(|_| {
            Error::forbidden("only committee members or managers can create global notifications")
        })?;
    }

    let notification = state
        .notifier
        .create(NewNotification {
            title,
            message,
            kind: payload.kind,
            priority: payload.priority,
            user_id: payload.user_id,
            is_global: payload.is_global,
            related_entity_type: payload.related_entity_type,
            related_entity_id: payload.related_entity_id,
            expires_at: payload.expires_at,
            action_link: payload.action_link,
        })
        .await?;
    Ok(HttpResponse::Created().json(notification))
}

/// Mark one notification read.
#[utoipa::path(
    patch,
    path = "/api/notifications/{id}/read",
    params(("id" = i32, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Updated notification", body = Notification),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 404, description = "Notification not found", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead"
)]
#[patch("/notifications/{id}/read")]
pub async fn mark_notification_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Notification>> {
    state.require_session_user(&session).await?;
    Ok(web::Json(state.notifier.mark_read(path.into_inner()).await?))
}

/// Mark every visible notification read. Safe to repeat.
#[utoipa::path(
    patch,
    path = "/api/notifications/read-all",
    responses(
        (status = 200, description = "All notifications marked read"),
        (status = 401, description = "Unauthenticated", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "markAllNotificationsRead"
)]
#[patch("/notifications/read-all")]
pub async fn mark_all_read(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let actor = state.require_session_user(&session).await?;
    state.notifier.mark_all_read(actor.id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "All notifications marked as read"
    })))
}

/// Permanently delete a notification.
#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    params(("id" = i32, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Notification deleted"),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 404, description = "Notification not found", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "deleteNotification"
)]
#[delete("/notifications/{id}")]
pub async fn delete_notification(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    state.require_session_user(&session).await?;
    state.notifier.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Notification deleted successfully"
    })))
}
