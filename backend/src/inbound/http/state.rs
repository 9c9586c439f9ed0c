//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on the domain
//! service, so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::AuthService;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Register, login, me, and logout.
    pub auth: Arc<AuthService>,
}

impl HttpState {
    /// Wrap the auth service for handler injection.
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self { auth }
    }
}
