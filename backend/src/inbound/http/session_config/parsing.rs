//! Environment value parsing shared by the session toggles.

use actix_web::cookie::SameSite;
use mockable::Env;
use tracing::warn;

use super::{BuildMode, SAMESITE_ENV, SessionConfigError};

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// A boolean toggle and the value debug builds fall back to.
pub(super) struct BoolEnvConfig {
    name: &'static str,
    fallback: bool,
}

impl BoolEnvConfig {
    pub(super) const fn new(name: &'static str, fallback: bool) -> Self {
        Self { name, fallback }
    }

    fn fallback_label(&self) -> &'static str {
        if self.fallback { "enabled" } else { "disabled" }
    }
}

/// Read a boolean toggle, then let `check` veto the parsed value.
pub(super) fn parse_bool_env<E, F>(
    env: &E,
    mode: BuildMode,
    config: BoolEnvConfig,
    check: F,
) -> Result<bool, SessionConfigError>
where
    E: Env,
    F: FnOnce(bool, BuildMode) -> Result<bool, SessionConfigError>,
{
    let Some(raw) = env.string(config.name) else {
        return debug_warn_or_error(
            mode,
            config.fallback,
            SessionConfigError::MissingEnv { name: config.name },
            || {
                warn!(
                    "{} not set; defaulting to {}",
                    config.name,
                    config.fallback_label()
                );
            },
        );
    };

    if let Some(flag) = parse_bool(&raw) {
        return check(flag, mode);
    }
    debug_warn_or_error(
        mode,
        config.fallback,
        SessionConfigError::InvalidEnv {
            name: config.name,
            value: raw.clone(),
            expected: BOOL_EXPECTED,
        },
        || {
            warn!(
                value = %raw,
                "invalid {}; defaulting to {}",
                config.name,
                config.fallback_label()
            );
        },
    )
}

/// Debug builds warn and use `fallback`; release builds fail with `error`.
pub(super) fn debug_warn_or_error<T>(
    mode: BuildMode,
    fallback: T,
    error: SessionConfigError,
    warn_fn: impl FnOnce(),
) -> Result<T, SessionConfigError> {
    if mode.is_debug() {
        warn_fn();
        Ok(fallback)
    } else {
        Err(error)
    }
}

/// Parse a `SameSite` policy; `None` needs a secure cookie in release.
pub(super) fn parse_same_site_value(
    value: String,
    mode: BuildMode,
    cookie_secure: bool,
    fallback: SameSite,
) -> Result<SameSite, SessionConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => debug_warn_or_error(
            mode,
            SameSite::None,
            SessionConfigError::InsecureSameSiteNone,
            || warn!("SESSION_SAMESITE=None without a secure cookie; browsers may drop it"),
        ),
        _ => debug_warn_or_error(
            mode,
            fallback,
            SessionConfigError::InvalidEnv {
                name: SAMESITE_ENV,
                value: value.clone(),
                expected: SAMESITE_EXPECTED,
            },
            || warn!(value = %value, "invalid SESSION_SAMESITE, using default"),
        ),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
