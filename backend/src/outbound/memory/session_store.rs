//! `SessionStore` backed by process memory with TTL expiry.
//!
//! Expired entries resolve as absent immediately; a background sweeper
//! reclaims their memory on an interval.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::{Clock, DefaultClock};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::domain::ports::{SessionStore, SessionStoreError};
use crate::domain::{SessionToken, UserId};

/// Session lifetime used when none is configured.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(2 * 60 * 60);

#[derive(Debug, Clone, Copy)]
struct SessionEntry {
    user_id: UserId,
    expires_at: DateTime<Utc>,
}

/// In-memory token-to-user map.
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionToken, SessionEntry>>,
    ttl: TimeDelta,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL, Arc::new(DefaultClock))
    }
}

impl MemorySessionStore {
    /// Create a store whose entries live for `ttl` as measured by `clock`.
    pub fn new(ttl: Duration, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            clock,
        }
    }

    /// Drop every expired entry and return how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.utc();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| now < entry.expires_at);
        before - sessions.len()
    }

    /// Number of stored entries, expired ones included until purged.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether the store holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Run [`Self::purge_expired`] every `every` until the task is aborted.
    pub fn spawn_sweeper(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let removed = self.purge_expired().await;
                if removed > 0 {
                    debug!(removed, "expired sessions purged");
                }
            }
        })
    }

    fn expiry_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn bind(&self, token: &SessionToken, user_id: UserId) -> Result<(), SessionStoreError> {
        let expires_at = self.expiry_from(self.clock.utc());
        self.sessions
            .write()
            .await
            .insert(token.clone(), SessionEntry {
                user_id,
                expires_at,
            });
        Ok(())
    }

    async fn resolve(&self, token: &SessionToken) -> Result<Option<UserId>, SessionStoreError> {
        let now = self.clock.utc();
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(token)
            .filter(|entry| now < entry.expires_at)
            .map(|entry| entry.user_id))
    }

    async fn revoke(&self, token: &SessionToken) -> Result<(), SessionStoreError> {
        self.sessions.write().await.remove(token);
        Ok(())
    }
}
