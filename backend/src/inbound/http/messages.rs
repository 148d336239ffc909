//! Member messaging handlers.
//!
//! ```text
//! GET /api/messages             authenticated, own plus global
//! POST /api/messages            authenticated
//! PUT /api/messages/{id}/read   authenticated
//! ```

use actix_web::{get, post, put, web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{Error, Message, NewMessage};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{require_text, FieldName};
use crate::inbound::http::ApiResult;

/// Message creation body. Exactly one of `recipient_id` / `is_global` must
/// address the message.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[serde(default)]
    pub recipient_id: Option<i32>,
    #[serde(default)]
    pub is_global: bool,
    pub subject: String,
    pub content: String,
}

/// Messages visible to the session user.
#[utoipa::path(
    get,
    path = "/api/messages",
    responses(
        (status = 200, description = "Messages", body = [Message]),
        (status = 401, description = "Unauthenticated", body = Error)
    ),
    tags = ["messages"],
    operation_id = "listMessages"
)]
#[get("/messages")]
pub async fn list_messages(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Message>>> {
    let actor = state.require_session_user(&session).await?;
    Ok(web::Json(state.messages.list_for_user(actor.id).await?))
}

/// Send a direct or global message.
#[utoipa::path(
    post,
    path = "/api/messages",
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = Message),
        (status = 400, description = "Invalid message data", body = Error),
        (status = 401, description = "Unauthenticated", body = Error)
    ),
    tags = ["messages"],
    operation_id = "sendMessage"
)]
#[post("/messages")]
pub async fn send_message(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SendMessageRequest>,
) -> ApiResult<HttpResponse> {
    let actor = state.require_session_user(&session).await?;
    let payload = payload.into_inner();
    let subject = require_text(&payload.subject, FieldName::new("subject"))?;
    let content = require_text(&payload.content, FieldName::new("content"))?;

    if payload.recipient_id.is_some() == payload.is_global {
        return Err(Error::invalid_request(
            "message must be either global or addressed to one recipient",
        ));
    }
    if let Some(recipient_id) = payload.recipient_id {
        state
            .users
            .find(recipient_id)
            .await?
            .ok_or_else(|| Error::invalid_request("recipient does not exist"))?;
    }

    let message = state
        .messages
        .create(NewMessage {
            sender_id: actor.id,
            recipient_id: payload.recipient_id,
            is_global: payload.is_global,
            subject,
            content,
        })
        .await?;
    Ok(HttpResponse::Created().json(message))
}

/// Stamp a message as read.
#[utoipa::path(
    put,
    path = "/api/messages/{id}/read",
    params(("id" = i32, Path, description = "Message id")),
    responses(
        (status = 200, description = "Updated message", body = Message),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 404, description = "Message not found", body = Error)
    ),
    tags = ["messages"],
    operation_id = "markMessageRead"
)]
#[put("/messages/{id}/read")]
pub async fn mark_message_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Message>> {
    state.require_session_user(&session).await?;
    let message = state
        .messages
        .mark_read(path.into_inner(), Utc::now())
        .await?
        .ok_or_else(|| Error::not_found("message not found"))?;
    Ok(web::Json(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::inbound::http::test_utils::{login_as, seed_user, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn direct_messages_reach_only_their_recipient() {
        let (app, store) = test_app().await;
        let ada = seed_user(&store, "ada", "ada@example.org", Role::Gardener).await;
        seed_user(&store, "brian", "brian@example.org", Role::Gardener).await;
        seed_user(&store, "casey", "casey@example.org", Role::Gardener).await;

        let brian = login_as(&app, "brian").await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/messages")
                .cookie(brian)
                .set_json(json!({
                    "recipientId": ada.id,
                    "subject": "Hose",
                    "content": "Could you coil the hose after use?"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let ada_cookie = login_as(&app, "ada").await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/messages")
                .cookie(ada_cookie)
                .to_request(),
        )
        .await;
        let inbox: Value = test::read_body_json(res).await;
        assert_eq!(inbox.as_array().map(Vec::len), Some(1));

        let casey = login_as(&app, "casey").await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/messages")
                .cookie(casey)
                .to_request(),
        )
        .await;
        let inbox: Value = test::read_body_json(res).await;
        assert_eq!(inbox.as_array().map(Vec::len), Some(0));
    }

    #[actix_web::test]
    async fn a_message_cannot_be_both_global_and_addressed() {
        let (app, store) = test_app().await;
        let ada = seed_user(&store, "ada", "ada@example.org", Role::Gardener).await;
        let cookie = login_as(&app, "ada").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/messages")
                .cookie(cookie.clone())
                .set_json(json!({
                    "recipientId": ada.id,
                    "isGlobal": true,
                    "subject": "s",
                    "content": "c"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        // Neither mode set is equally invalid.
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/messages")
                .cookie(cookie)
                .set_json(json!({ "subject": "s", "content": "c" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn global_messages_appear_in_every_inbox() {
        let (app, store) = test_app().await;
        seed_user(&store, "ada", "ada@example.org", Role::Gardener).await;
        seed_user(&store, "brian", "brian@example.org", Role::Gardener).await;

        let ada = login_as(&app, "ada").await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/messages")
                .cookie(ada)
                .set_json(json!({
                    "isGlobal": true,
                    "subject": "Water schedule",
                    "content": "Evening watering only during the heat wave."
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let brian = login_as(&app, "brian").await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/messages")
                .cookie(brian)
                .to_request(),
        )
        .await;
        let inbox: Value = test::read_body_json(res).await;
        assert_eq!(inbox.as_array().map(Vec::len), Some(1));
    }
}
