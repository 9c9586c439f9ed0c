//! Process settings loaded via OrthoConfig, and the assembled server config.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;

use auth_backend::domain::{AuthServiceConfig, DEFAULT_CALL_TIMEOUT};
use auth_backend::inbound::http::session_config::SessionSettings;
use auth_backend::outbound::crypto::Argon2Params;

const DEFAULT_PORT: u16 = 8080;
/// Two hours; mirrored by the `ortho_config` default on `session_ttl_secs`.
const DEFAULT_SESSION_TTL_SECS: u64 = 7200;

/// Settings read from `AUTH_*` variables, config files, and CLI flags.
///
/// Optional fields fall back to defaults in their accessors.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "AUTH")]
pub struct AuthSettings {
    /// Listen address, default `0.0.0.0:8080`.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL URL. Without it users live in memory.
    pub database_url: Option<String>,
    /// Redis URL. Without it sessions live in memory.
    pub redis_url: Option<String>,
    /// Session lifetime in seconds, shared by the store and the cookie.
    #[ortho_config(default = 7200)]
    pub session_ttl_secs: u64,
    /// Upper bound for any single directory, hasher, or store call.
    pub call_timeout_ms: Option<u64>,
    /// Argon2 memory cost in KiB.
    pub argon2_memory_kib: Option<u32>,
    /// Argon2 passes.
    pub argon2_iterations: Option<u32>,
    /// Argon2 lanes.
    pub argon2_parallelism: Option<u32>,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            bind_addr: None,
            database_url: None,
            redis_url: None,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            call_timeout_ms: None,
            argon2_memory_kib: None,
            argon2_iterations: None,
            argon2_parallelism: None,
        }
    }
}

impl AuthSettings {
    /// Configured listen address or `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))
    }

    /// Session lifetime, at least one second.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs.max(1))
    }

    /// Service configuration derived from `call_timeout_ms`.
    pub fn auth_service_config(&self) -> AuthServiceConfig {
        AuthServiceConfig {
            call_timeout: self
                .call_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_CALL_TIMEOUT),
        }
    }

    /// Argon2 cost parameters, falling back per field to the library defaults.
    pub fn argon2_params(&self) -> Argon2Params {
        let defaults = Argon2Params::default();
        Argon2Params {
            memory_kib: self.argon2_memory_kib.unwrap_or(defaults.memory_kib),
            iterations: self.argon2_iterations.unwrap_or(defaults.iterations),
            parallelism: self.argon2_parallelism.unwrap_or(defaults.parallelism),
        }
    }
}

/// Everything `create_server` needs besides the health state.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) session_ttl: Duration,
}

impl ServerConfig {
    /// Combine cookie settings with the loaded process settings.
    #[must_use]
    pub fn new(session: SessionSettings, settings: &AuthSettings) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr: settings.bind_addr(),
            session_ttl: settings.session_ttl(),
        }
    }

    /// Socket address the server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
