//! Domain primitives, ports, and the auth use cases.
//!
//! Purpose: define strongly typed entities shared by the HTTP and persistence
//! layers, the ports those layers implement, and the [`AuthService`] that
//! orchestrates them. Types are immutable once constructed and document their
//! invariants and serde contracts in Rustdoc.
//!
//! Public surface:
//! - [`AuthService`]: register, login, me, logout.
//! - [`AuthOutcome`] and [`FieldError`]: user-facing results.
//! - [`Error`] and [`ErrorCode`]: infrastructure failures.
//! - [`User`], [`UserId`], [`Username`]: identity.
//! - [`SessionToken`] and [`SessionContext`]: session binding.

pub mod auth;
pub mod auth_service;
pub mod error;
pub mod ports;
pub mod session;
pub mod trace_id;
pub mod user;

pub use self::auth::{
    AuthOutcome, CredentialField, Credentials, FieldError, PASSWORD_MIN_EXCLUSIVE,
    USERNAME_MIN_EXCLUSIVE, validate_credentials,
};
pub use self::auth_service::{AuthService, AuthServiceConfig, DEFAULT_CALL_TIMEOUT};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::session::{SessionContext, SessionContextError, SessionToken, SessionTokenError};
pub use self::trace_id::TraceId;
pub use self::user::{
    NewUser, PasswordHash, User, UserId, UserRecord, UserValidationError, Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use auth_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::service_unavailable("try again"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
