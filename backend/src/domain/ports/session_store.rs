//! Port for the server-side session store.
//!
//! The store maps opaque tokens to user identifiers and owns expiry. A token
//! that has expired must resolve exactly like an unknown one.

use async_trait::async_trait;

use crate::domain::{SessionToken, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by session store adapters.
    pub enum SessionStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "session store connection failed: {message}",
        /// Command failed during execution.
        Query { message: String } => "session store query failed: {message}",
    }
}

/// Token-to-user mapping with store-defined expiry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Bind `token` to `user_id`, replacing any previous binding.
    async fn bind(&self, token: &SessionToken, user_id: UserId) -> Result<(), SessionStoreError>;

    /// Look up the user bound to `token`, if the binding is still live.
    async fn resolve(&self, token: &SessionToken) -> Result<Option<UserId>, SessionStoreError>;

    /// Remove the binding for `token`. Unknown tokens are not an error.
    async fn revoke(&self, token: &SessionToken) -> Result<(), SessionStoreError>;
}
