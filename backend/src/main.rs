//! Backend entry-point: loads settings, selects the results store and serves
//! the battery API.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use cogbattery::inbound::http::health::HealthState;
use cogbattery::inbound::http::session_config::{BuildMode, session_settings_from_env};
use cogbattery::settings::AppSettings;
use server::{ServerConfig, build_state_from_settings, create_server};

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

    let mode = BuildMode::current();
    let settings = AppSettings::load().map_err(std::io::Error::other)?;
    let session = session_settings_from_env(&DefaultEnv::new(), mode).map_err(std::io::Error::other)?;
    let session_ttl = settings.session_ttl().map_err(std::io::Error::other)?;
    let http_state = build_state_from_settings(&settings, mode).await?;

    let config = ServerConfig::new(session, settings.bind_addr()).with_session_ttl(session_ttl);
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, http_state, config)?;
    server.await
}
