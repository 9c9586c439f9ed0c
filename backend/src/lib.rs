//! Session-authenticated user registration and login.
//!
//! The [`domain`] holds the auth rules and the ports they depend on;
//! [`inbound`] exposes them over HTTP and [`outbound`] provides the
//! PostgreSQL, Redis, Argon2, and in-memory adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
