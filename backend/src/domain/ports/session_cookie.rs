//! Port for the request-scoped session token carrier.
//!
//! Inbound adapters implement this over whatever transport holds the token
//! (an encrypted cookie for HTTP). It is synchronous and need not be `Send`:
//! one instance lives for one request.

use crate::domain::SessionToken;

use super::define_port_error;

define_port_error! {
    /// Errors raised while reading or writing the session token slot.
    pub enum SessionCookieError {
        /// The slot could not be read.
        Read { message: String } => "failed to read session cookie: {message}",
        /// The slot could not be written.
        Write { message: String } => "failed to write session cookie: {message}",
    }
}

/// Slot carrying the caller's opaque session token.
#[cfg_attr(test, mockall::automock)]
pub trait SessionCookie {
    /// Raw token currently carried, if any.
    ///
    /// Values that fail [`SessionToken::parse`] are reported as absent.
    fn token(&self) -> Result<Option<SessionToken>, SessionCookieError>;

    /// Store `token`, rotating the carrier identifier where supported.
    fn set_token(&self, token: &SessionToken) -> Result<(), SessionCookieError>;

    /// Remove any token from the carrier.
    fn clear(&self);
}
