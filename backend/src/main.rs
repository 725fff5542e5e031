//! Roadwatch entry-point: loads configuration, wires adapters and serves the
//! REST API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

use roadwatch::config::RoadwatchSettings;
use roadwatch::inbound::http::health::HealthState;
use roadwatch::inbound::http::session_config::{BuildMode, SessionOptions, session_settings};
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = RoadwatchSettings::load().map_err(|e| {
        error!(error = %e, "failed to load configuration");
        std::io::Error::other(format!("configuration: {e}"))
    })?;
    let service = settings.validate().map_err(|e| {
        error!(error = %e, "invalid configuration");
        std::io::Error::other(e.to_string())
    })?;
    let session = session_settings(
        &SessionOptions::from(&settings),
        BuildMode::from_debug_assertions(),
    )
    .map_err(|e| {
        error!(error = %e, "invalid session configuration");
        std::io::Error::other(e.to_string())
    })?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, ServerConfig::new(service, session))?;
    server.await
}
