//! Backend entry-point: wires REST endpoints, health probes, and OpenAPI
//! docs over the in-process store.

mod server;

use actix_web::web;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use backend::inbound::http::health::HealthState;
use server::ServerConfig;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(err) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %err, "tracing init failed");
    }

    let config = ServerConfig::from_env()?;
    let health_state = web::Data::new(HealthState::new());
    let server = server::create_server(health_state, config)?;
    server.await
}
