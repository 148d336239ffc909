//! End-to-end workflow tests over the HTTP surface.
//!
//! Drives the application/plot-assignment workflow the way a client would:
//! register, log in, submit, approve or reject, and observe the derived
//! state through the API.

use std::sync::Arc;

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App};
use mockable::DefaultClock;
use serde_json::{json, Value};

use backend::domain::ports::{PlotRepository, UserRepository};
use backend::domain::{NewPlot, NewUser, PlotStatus, Role};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::mount_api;
use backend::outbound::mailer::LogMailer;
use backend::outbound::memory::MemoryStore;

async fn spawn_app() -> (
    impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    Arc<MemoryStore>,
) {
    let store = Arc::new(MemoryStore::new());
    let state = web::Data::new(HttpState::over_store(
        store.clone(),
        Arc::new(LogMailer),
        Arc::new(DefaultClock),
    ));
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".into())
        .cookie_secure(false)
        .build();
    let app = test::init_service(
        App::new()
            .app_data(state)
            .service(mount_api(web::scope("/api")).wrap(session)),
    )
    .await;
    (app, store)
}

async fn seed_user(store: &MemoryStore, username: &str, role: Role) -> backend::domain::User {
    UserRepository::create(
        store,
        NewUser {
            username: username.into(),
            password: "pw".into(),
            email: format!("{username}@example.org"),
            first_name: username.into(),
            last_name: "Member".into(),
            phone: None,
            address: None,
            role,
        },
    )
    .await
    .expect("seed user")
}

async fn seed_plot(store: &MemoryStore, number: &str) -> backend::domain::Plot {
    PlotRepository::create(
        store,
        NewPlot {
            plot_number: number.into(),
            status: PlotStatus::Available,
            area: number.chars().take(1).collect(),
            size: "10x10".into(),
            yearly_fee: 5000,
            notes: None,
        },
    )
    .await
    .expect("seed plot")
}

async fn login<S>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "username": username, "password": "pw" }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "login failed for {username}");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

async fn submit_application<S>(app: &S, cookie: &Cookie<'static>) -> i64
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/applications")
            .cookie(cookie.clone())
            .set_json(json!({ "gardenerType": "new" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 201);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["status"].as_str(), Some("pending"));
    assert_eq!(body["priority"].as_i64(), Some(0));
    body["id"].as_i64().expect("application id")
}

#[actix_web::test]
async fn new_gardener_application_is_approved_onto_the_first_plot() {
    let (app, store) = spawn_app().await;
    seed_user(&store, "ada", Role::Gardener).await;
    seed_user(&store, "grace", Role::Manager).await;
    let plot = seed_plot(&store, "A1").await;

    let gardener = login(&app, "ada").await;
    let application_id = submit_application(&app, &gardener).await;

    let manager = login(&app, "grace").await;
    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/applications/{application_id}"))
            .cookie(manager)
            .set_json(json!({ "action": "approve" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 200);
    let approved: Value = test::read_body_json(res).await;
    assert_eq!(approved["status"].as_str(), Some("approved"));
    assert!(approved["processedAt"].is_string());

    // The plot is now bound to the applicant.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/plots/{}", plot.id))
            .to_request(),
    )
    .await;
    let bound: Value = test::read_body_json(res).await;
    assert_eq!(bound["status"].as_str(), Some("assigned"));
    assert!(bound["assignedTo"].is_i64());

    // Exactly one notification of type application reached the gardener.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/notifications")
            .cookie(gardener.clone())
            .to_request(),
    )
    .await;
    let inbox: Value = test::read_body_json(res).await;
    let inbox = inbox.as_array().expect("array");
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0]["type"].as_str(), Some("application"));

    // The derived yearly-fee payment is visible to its owner.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/payments")
            .cookie(gardener)
            .to_request(),
    )
    .await;
    let payments: Value = test::read_body_json(res).await;
    let payments = payments.as_array().expect("array");
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0]["amount"].as_i64(), Some(5000));
    assert_eq!(payments[0]["status"].as_str(), Some("pending"));
}

#[actix_web::test]
async fn approving_the_second_application_fails_when_the_plot_is_taken() {
    let (app, store) = spawn_app().await;
    seed_user(&store, "ada", Role::Gardener).await;
    seed_user(&store, "brian", Role::Gardener).await;
    seed_user(&store, "grace", Role::Manager).await;
    seed_plot(&store, "A1").await;

    let ada = login(&app, "ada").await;
    let first = submit_application(&app, &ada).await;
    let brian = login(&app, "brian").await;
    let second = submit_application(&app, &brian).await;

    let manager = login(&app, "grace").await;
    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/applications/{first}"))
            .cookie(manager.clone())
            .set_json(json!({ "action": "approve" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 200);

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/applications/{second}"))
            .cookie(manager.clone())
            .set_json(json!({ "action": "approve" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 409);

    // The losing application is untouched.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/applications/{second}"))
            .cookie(manager)
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["status"].as_str(), Some("pending"));
    assert!(body["processedAt"].is_null() || body.get("processedAt").is_none());
}

#[actix_web::test]
async fn rejection_without_a_reason_changes_nothing() {
    let (app, store) = spawn_app().await;
    seed_user(&store, "ada", Role::Gardener).await;
    seed_user(&store, "grace", Role::Manager).await;

    let ada = login(&app, "ada").await;
    let id = submit_application(&app, &ada).await;

    let manager = login(&app, "grace").await;
    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/applications/{id}"))
            .cookie(manager.clone())
            .set_json(json!({ "action": "reject", "note": "  " }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 400);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/applications/{id}"))
            .cookie(manager)
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["status"].as_str(), Some("pending"));
}

#[actix_web::test]
async fn revoke_returns_the_plot_to_the_pool() {
    let (app, store) = spawn_app().await;
    seed_user(&store, "ada", Role::Gardener).await;
    seed_user(&store, "grace", Role::Manager).await;
    let plot = seed_plot(&store, "A1").await;

    let ada = login(&app, "ada").await;
    let id = submit_application(&app, &ada).await;
    let manager = login(&app, "grace").await;

    for action in [json!({ "action": "approve" }), json!({ "action": "revoke" })] {
        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/applications/{id}"))
                .cookie(manager.clone())
                .set_json(action)
                .to_request(),
        )
        .await;
        assert_eq!(res.status().as_u16(), 200);
    }

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/plots/{}", plot.id))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["status"].as_str(), Some("available"));
    assert!(body.get("assignedTo").is_none() || body["assignedTo"].is_null());
}

#[actix_web::test]
async fn dashboard_reports_percent_assigned_over_ten_plots() {
    let (app, store) = spawn_app().await;
    seed_user(&store, "ada", Role::Gardener).await;

    // 10 plots, 3 still available => 70% assigned.
    for i in 1..=10 {
        let plot = seed_plot(&store, &format!("A{i}")).await;
        if i > 3 {
            store
                .assign_if_available(plot.id, 1)
                .await
                .expect("assign plot");
        }
    }

    let cookie = login(&app, "ada").await;
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/dashboard")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 200);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["plots"]["total"].as_u64(), Some(10));
    assert_eq!(body["plots"]["available"].as_u64(), Some(3));
    assert_eq!(body["plots"]["percentAssigned"].as_i64(), Some(70));
}
