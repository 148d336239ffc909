//! Forum Q&A handlers.
//!
//! ```text
//! GET  /api/forum                public
//! GET  /api/forum/{id}           public, question plus answers
//! POST /api/forum                authenticated
//! POST /api/forum/{id}/answers   authenticated
//! ```

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, ForumAnswer, ForumQuestion};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{require_text, FieldName};
use crate::inbound::http::ApiResult;

/// Question creation body.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostQuestionRequest {
    pub title: String,
    pub content: String,
}

/// Answer creation body.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostAnswerRequest {
    pub content: String,
}

/// A question with its answers.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionThread {
    pub question: ForumQuestion,
    pub answers: Vec<ForumAnswer>,
}

/// List all questions.
#[utoipa::path(
    get,
    path = "/api/forum",
    responses((status = 200, description = "Questions", body = [ForumQuestion])),
    tags = ["forum"],
    operation_id = "listQuestions",
    security([])
)]
#[get("/forum")]
pub async fn list_questions(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<ForumQuestion>>> {
    Ok(web::Json(state.forum.list_questions().await?))
}

/// Fetch a question and its answers.
#[utoipa::path(
    get,
    path = "/api/forum/{id}",
    params(("id" = i32, Path, description = "Question id")),
    responses(
        (status = 200, description = "Question thread", body = QuestionThread),
        (status = 404, description = "Question not found", body = Error)
    ),
    tags = ["forum"],
    operation_id = "getQuestion",
    security([])
)]
#[get("/forum/{id}")]
pub async fn get_question(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<QuestionThread>> {
    let id = path.into_inner();
    let question = state
        .forum
        .find_question(id)
        .await?
        .ok_or_else(|| Error::not_found("question not found"))?;
    let answers = state.forum.answers_for(id).await?;
    Ok(web::Json(QuestionThread { question, answers }))
}

/// Post a question.
#[utoipa::path(
    post,
    path = "/api/forum",
    request_body = PostQuestionRequest,
    responses(
        (status = 201, description = "Question created", body = ForumQuestion),
        (status = 400, description = "Invalid question data", body = Error),
        (status = 401, description = "Unauthenticated", body = Error)
    ),
    tags = ["forum"],
    operation_id = "postQuestion"
)]
#[post("/forum")]
pub async fn post_question(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PostQuestionRequest>,
) -> ApiResult<HttpResponse> {
    let actor = state.require_session_user(&session).await?;
    let payload = payload.into_inner();
    let title = require_text(&payload.title, FieldName::new("title"))?;
    let content = require_text(&payload.content, FieldName::new("content"))?;

    let question = state.forum.create_question(actor.id, title, content).await?;
    Ok(HttpResponse::Created().json(question))
}

/// Post an answer under a question.
#[utoipa::path(
    post,
    path = "/api/forum/{id}/answers",
    request_body = PostAnswerRequest,
    params(("id" = i32, Path, description = "Question id")),
    responses(
        (status = 201, description = "Answer created", body = ForumAnswer),
        (status = 400, description = "Invalid answer data", body = Error),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 404, description = "Question not found", body = Error)
    ),
    tags = ["forum"],
    operation_id = "postAnswer"
)]
#[post("/forum/{id}/answers")]
pub async fn post_answer(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
    payload: web::Json<PostAnswerRequest>,
) -> ApiResult<HttpResponse> {
    let actor = state.require_session_user(&session).await?;
    let question_id = path.into_inner();
    let content = require_text(&payload.content, FieldName::new("content"))?;

    state
        .forum
        .find_question(question_id)
        .await?
        .ok_or_else(|| Error::not_found("question not found"))?;

    let answer = state
        .forum
        .create_answer(question_id, actor.id, content)
        .await?;
    Ok(HttpResponse::Created().json(answer))
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
    async fn question_thread_carries_its_answers() {
        let (app, store) = test_app().await;
        seed_user(&store, "ada", "ada@example.org", Role::Gardener).await;
        let cookie = login_as(&app, "ada").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/forum")
                .cookie(cookie.clone())
                .set_json(json!({ "title": "Compost?", "content": "How do I start?" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let question: Value = test::read_body_json(res).await;
        let id = question.get("id").and_then(Value::as_i64).expect("id");

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/forum/{id}/answers"))
                .cookie(cookie)
                .set_json(json!({ "content": "Layer greens and browns." }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/forum/{id}"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let thread: Value = test::read_body_json(res).await;
        assert_eq!(
            thread["question"]["title"].as_str(),
            Some("Compost?")
        );
        assert_eq!(thread["answers"].as_array().map(Vec::len), Some(1));
    }

    #[actix_web::test]
    async fn posting_requires_a_session_but_reading_does_not() {
        let (app, _store) = test_app().await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/forum")
                .set_json(json!({ "title": "t", "content": "c" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/api/forum").to_request())
                .await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
