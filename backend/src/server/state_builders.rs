//! Adapter selection for the HTTP state.
//!
//! PostgreSQL and Redis are used when their URLs are configured; otherwise
//! the in-memory adapters stand in.

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use thiserror::Error;
use tracing::info;

use auth_backend::domain::AuthService;
use auth_backend::domain::ports::{
    CredentialHasherError, SessionStore, SessionStoreError, UserDirectory,
};
use auth_backend::inbound::http::state::HttpState;
use auth_backend::outbound::cache::RedisSessionStore;
use auth_backend::outbound::crypto::Argon2CredentialHasher;
use auth_backend::outbound::memory::{MemorySessionStore, MemoryUserDirectory};
use auth_backend::outbound::persistence::{DbPool, DieselUserDirectory, PoolConfig, PoolError};
use mockable::DefaultClock;

use super::config::AuthSettings;

/// How often the in-memory store drops expired entries.
const MEMORY_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Failures while wiring adapters at startup.
#[derive(Debug, Error)]
pub enum StateBuildError {
    /// The PostgreSQL pool could not be built.
    #[error(transparent)]
    Database(#[from] PoolError),
    /// The Redis pool could not be built.
    #[error("session store unavailable: {0}")]
    SessionStore(#[from] SessionStoreError),
    /// Argon2 rejected the configured cost parameters.
    #[error("credential hasher misconfigured: {0}")]
    Hasher(#[from] CredentialHasherError),
}

async fn build_directory(settings: &AuthSettings) -> Result<Arc<dyn UserDirectory>, PoolError> {
    match settings.database_url.as_deref() {
        Some(url) => {
            let pool = DbPool::new(PoolConfig::new(url)).await?;
            info!("using PostgreSQL user directory");
            Ok(Arc::new(DieselUserDirectory::new(pool)))
        }
        None => {
            info!("AUTH_DATABASE_URL not set; users are kept in memory");
            Ok(Arc::new(MemoryUserDirectory::new()))
        }
    }
}

async fn build_session_store(
    settings: &AuthSettings,
) -> Result<Arc<dyn SessionStore>, SessionStoreError> {
    let ttl = settings.session_ttl();
    match settings.redis_url.as_deref() {
        Some(url) => {
            let store = RedisSessionStore::connect(url, ttl).await?;
            info!(ttl_secs = ttl.as_secs(), "using Redis session store");
            Ok(Arc::new(store))
        }
        None => {
            info!("AUTH_REDIS_URL not set; sessions are kept in memory");
            let store = Arc::new(MemorySessionStore::new(ttl, Arc::new(DefaultClock)));
            Arc::clone(&store).spawn_sweeper(MEMORY_SWEEP_INTERVAL);
            Ok(store)
        }
    }
}

/// Build the handler state from the loaded settings.
pub async fn build_http_state(
    settings: &AuthSettings,
) -> Result<web::Data<HttpState>, StateBuildError> {
    let directory = build_directory(settings).await?;
    let sessions = build_session_store(settings).await?;
    let hasher = Argon2CredentialHasher::with_params(settings.argon2_params())?;
    let service = AuthService::new(
        directory,
        Arc::new(hasher),
        sessions,
        settings.auth_service_config(),
    );
    Ok(web::Data::new(HttpState::new(Arc::new(service))))
}
