//! Dashboard handler.
//!
//! ```text
//! GET /api/dashboard   authenticated
//! ```

use actix_web::{get, web};

use crate::domain::{DashboardSnapshot, Error};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Aggregated summary statistics, recomputed per request.
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Dashboard snapshot", body = DashboardSnapshot),
        (status = 401, description = "Unauthenticated", body = Error)
    ),
    tags = ["dashboard"],
    operation_id = "getDashboard"
)]
#[get("/dashboard")]
pub async fn get_dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DashboardSnapshot>> {
    state.require_session_user(&session).await?;
    Ok(web::Json(state.dashboard.compute().await?))
}

#[cfg(test)]
mod tests {
    use crate::domain::Role;
    use crate::inbound::http::test_utils::{login_as, seed_user, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::Value;

    #[actix_web::test]
    async fn dashboard_requires_a_session() {
        let (app, _store) = test_app().await;
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/dashboard").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn empty_garden_reports_zero_percent_assigned() {
        let (app, store) = test_app().await;
        seed_user(&store, "ada", "ada@example.org", Role::Gardener).await;
        let cookie = login_as(&app, "ada").await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/dashboard")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body["plots"]["percentAssigned"].as_i64(),
            Some(0)
        );
        assert_eq!(body["payments"]["outstanding"].as_i64(), Some(0));
    }
}
