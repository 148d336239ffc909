//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};
use mockable::DefaultClock;

use backend::domain::ports::Mailer;
use backend::inbound::http::health::{live, ready, HealthState};
use backend::inbound::http::mount_api;
use backend::inbound::http::state::HttpState;
use backend::outbound::mailer::{LogMailer, MailerConfig, ProviderMailer};
use backend::outbound::memory::MemoryStore;
use backend::Trace;
#[cfg(debug_assertions)]
use backend::ApiDoc;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Pick the mail adapter: the HTTP provider when a key is configured,
/// otherwise the logging fallback.
fn build_mailer(config: &ServerConfig) -> Arc<dyn Mailer> {
    match &config.mailer {
        Some(settings) => Arc::new(ProviderMailer::new(MailerConfig {
            api_url: settings.api_url.clone(),
            api_key: settings.api_key.clone(),
            from: settings.from.clone(),
        })),
        None => Arc::new(LogMailer),
    }
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .build();

    let api = mount_api(web::scope("/api")).wrap(session);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server from the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let mailer = build_mailer(&config);
    let store = Arc::new(MemoryStore::new());
    let http_state = web::Data::new(HttpState::over_store(
        store,
        mailer,
        Arc::new(DefaultClock),
    ));
    let ServerConfig {
        key,
        cookie_secure,
        bind_addr,
        mailer: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
