//! Helpers shared by HTTP handler tests.

use std::sync::Arc;

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App};
use mockable::DefaultClock;

use crate::domain::ports::Mailer;
use crate::domain::{NewUser, Role, User};
use crate::inbound::http::state::HttpState;
use crate::outbound::mailer::LogMailer;
use crate::outbound::memory::MemoryStore;

/// Cookie session middleware with an ephemeral key for tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".into())
        .cookie_secure(false)
        .build()
}

/// Wire an [`HttpState`] over a fresh memory store and log mailer.
pub fn test_state() -> (web::Data<HttpState>, Arc<MemoryStore>) {
    test_state_with_mailer(Arc::new(LogMailer))
}

/// Wire an [`HttpState`] over a fresh memory store and the given mailer.
pub fn test_state_with_mailer(
    mailer: Arc<dyn Mailer>,
) -> (web::Data<HttpState>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = HttpState::over_store(store.clone(), mailer, Arc::new(DefaultClock));
    (web::Data::new(state), store)
}

/// Initialise a full API app over a fresh store.
pub async fn test_app() -> (
    impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    Arc<MemoryStore>,
) {
    let (state, store) = test_state();
    let app = test::init_service(
        App::new().app_data(state).service(
            crate::inbound::http::mount_api(web::scope("/api")).wrap(test_session_middleware()),
        ),
    )
    .await;
    (app, store)
}

/// Seed a user with password `pw`.
pub async fn seed_user(store: &MemoryStore, username: &str, email: &str, role: Role) -> User {
    use crate::domain::ports::UserRepository;
    UserRepository::create(
        store,
        NewUser {
            username: username.into(),
            password: "pw".into(),
            email: email.into(),
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

/// Log in as a seeded user and return the session cookie.
pub async fn login_as<S>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(serde_json::json!({ "username": username, "password": "pw" }))
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
