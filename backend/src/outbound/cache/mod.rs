//! Redis-backed session store.
//!
//! Tokens never reach Redis in the clear: each binding is stored under
//! `session:v1:<sha256(token)>` with the user id as value and the session TTL
//! applied by `SET EX`. Expiry is therefore owned by Redis and an expired key
//! resolves exactly like an unknown one.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::redis::{AsyncCommands, RedisError};
use bb8_redis::{RedisConnectionManager, bb8};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::domain::ports::{SessionStore, SessionStoreError};
use crate::domain::{SessionToken, UserId};

const KEY_PREFIX: &str = "session:v1:";

/// Namespaced Redis key for `token`.
fn session_key(token: &SessionToken) -> String {
    let digest = Sha256::digest(token.as_str().as_bytes());
    format!("{KEY_PREFIX}{}", hex::encode(digest))
}

fn map_redis_error(error: RedisError) -> SessionStoreError {
    if error.is_io_error()
        || error.is_connection_refusal()
        || error.is_connection_dropped()
        || error.is_timeout()
    {
        SessionStoreError::connection(error.to_string())
    } else {
        SessionStoreError::query(error.to_string())
    }
}

fn map_pool_error(error: bb8::RunError<RedisError>) -> SessionStoreError {
    match error {
        bb8::RunError::User(err) => map_redis_error(err),
        bb8::RunError::TimedOut => SessionStoreError::connection("timed out waiting for connection"),
    }
}

/// `SET EX` takes whole seconds; round up so a binding never dies first.
fn expiry_secs(ttl: Duration) -> u64 {
    (ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0)).max(1)
}

/// [`SessionStore`] over a bb8 pool of Redis connections.
#[derive(Clone)]
pub struct RedisSessionStore {
    pool: bb8::Pool<RedisConnectionManager>,
    ttl_secs: u64,
}

impl RedisSessionStore {
    /// Connect to `redis_url` and keep bindings alive for `ttl`.
    ///
    /// Fractional TTLs are rounded up to whole seconds.
    pub async fn connect(redis_url: &str, ttl: Duration) -> Result<Self, SessionStoreError> {
        let manager = RedisConnectionManager::new(redis_url).map_err(map_redis_error)?;
        let pool = bb8::Pool::builder()
            .build(manager)
            .await
            .map_err(map_redis_error)?;
        Ok(Self::from_pool(pool, ttl))
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: bb8::Pool<RedisConnectionManager>, ttl: Duration) -> Self {
        Self {
            pool,
            ttl_secs: expiry_secs(ttl),
        }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn bind(&self, token: &SessionToken, user_id: UserId) -> Result<(), SessionStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.set_ex::<_, _, ()>(session_key(token), user_id.get(), self.ttl_secs)
            .await
            .map_err(map_redis_error)
    }

    async fn resolve(&self, token: &SessionToken) -> Result<Option<UserId>, SessionStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw: Option<i64> = conn
            .get(session_key(token))
            .await
            .map_err(map_redis_error)?;
        Ok(raw.and_then(|id| match UserId::new(id) {
            Ok(user_id) => Some(user_id),
            Err(err) => {
                debug!(error = %err, "ignoring malformed session binding");
                None
            }
        }))
    }

    async fn revoke(&self, token: &SessionToken) -> Result<(), SessionStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.del::<_, ()>(session_key(token))
            .await
            .map_err(map_redis_error)
    }
}
