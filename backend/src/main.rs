//! Backend entry-point: loads settings, wires adapters, and serves the auth API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use auth_backend::inbound::http::health::HealthState;
use auth_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use auth_backend::outbound::persistence::run_migrations;
use server::{AuthSettings, ServerConfig, build_http_state, create_server};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AuthSettings::load().wrap_err("failed to load AUTH_* settings")?;

    if let Some(url) = settings.database_url.as_deref() {
        run_migrations(url)
            .await
            .wrap_err("failed to apply database migrations")?;
    }

    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;
    info!(
        fingerprint = %session.key_fingerprint(),
        cookie_secure = session.cookie_secure,
        "session key loaded"
    );

    let http_state = build_http_state(&settings)
        .await
        .wrap_err("failed to initialise adapters")?;
    let config = ServerConfig::new(session, &settings);
    let bind_addr = config.bind_addr();

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, http_state, config)
        .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;
    info!(%bind_addr, "listening");
    server.await.wrap_err("server terminated with an error")
}
