//! Registration, login, and session-identity use cases.
//!
//! The service orchestrates the credential validator, the password hasher,
//! the user directory, and the session store. Field-level problems come back
//! as [`AuthOutcome::Errors`]; only infrastructure failures surface as
//! [`Error`]. Every port call is bounded by
//! [`AuthServiceConfig::call_timeout`] and a timeout maps to the retryable
//! [`ErrorCode::ServiceUnavailable`](crate::domain::ErrorCode::ServiceUnavailable).

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::domain::ports::{
    CredentialHasher, CredentialHasherError, SessionCookie, SessionStore, SessionStoreError,
    UserDirectory, UserDirectoryError,
};
use crate::domain::{
    AuthOutcome, Credentials, Error, FieldError, NewUser, SessionContext, SessionContextError,
    User, validate_credentials,
};

/// Default bound applied to each directory, hasher, and store call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Tunables for [`AuthService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthServiceConfig {
    /// Upper bound for any single port call.
    pub call_timeout: Duration,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}

/// Auth use cases over injected ports.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
///
/// use auth_backend::domain::{AuthService, AuthServiceConfig, Credentials};
/// use auth_backend::outbound::crypto::Argon2CredentialHasher;
/// use auth_backend::outbound::memory::{MemorySessionStore, MemoryUserDirectory};
///
/// # async fn demo() -> Result<(), auth_backend::domain::Error> {
/// let service = AuthService::new(
///     Arc::new(MemoryUserDirectory::new()),
///     Arc::new(Argon2CredentialHasher::default()),
///     Arc::new(MemorySessionStore::default()),
///     AuthServiceConfig::default(),
/// );
/// let outcome = service.register(&Credentials::new("alice", "secret1")).await?;
/// assert!(outcome.user().is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AuthService {
    directory: Arc<dyn UserDirectory>,
    hasher: Arc<dyn CredentialHasher>,
    sessions: Arc<dyn SessionStore>,
    config: AuthServiceConfig,
}

impl AuthService {
    /// Wire the service to its ports.
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        hasher: Arc<dyn CredentialHasher>,
        sessions: Arc<dyn SessionStore>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            directory,
            hasher,
            sessions,
            config,
        }
    }

    /// Create an account.
    ///
    /// The duplicate-username check runs before syntactic validation, so a
    /// taken name is reported even when the password is too short. Only the
    /// first validation error is returned.
    pub async fn register(&self, credentials: &Credentials) -> Result<AuthOutcome, Error> {
        let username = credentials.username();
        let existing = self
            .within("user lookup", self.directory.find_by_username(username))
            .await?
            .map_err(Self::map_directory_error)?;
        if existing.is_some() {
            debug!(%username, "registration rejected: username taken");
            return Ok(AuthOutcome::rejected(FieldError::username_taken()));
        }

        if let Some(first) = validate_credentials(credentials).into_iter().next() {
            debug!(%username, error = %first, "registration rejected: invalid credentials");
            return Ok(AuthOutcome::rejected(first));
        }

        let password_hash = self
            .within("password hashing", self.hasher.hash(credentials.password()))
            .await?
            .map_err(Self::map_hasher_error)?;

        let inserted = self
            .within(
                "user insert",
                self.directory
                    .insert(NewUser::new(username.clone(), password_hash)),
            )
            .await?;
        match inserted {
            Ok(user) => {
                info!(user_id = %user.id(), "user registered");
                Ok(AuthOutcome::User(user))
            }
            Err(UserDirectoryError::DuplicateUsername { .. }) => {
                debug!(%username, "registration lost a uniqueness race");
                Ok(AuthOutcome::rejected(FieldError::username_taken()))
            }
            Err(other) => Err(Self::map_directory_error(other)),
        }
    }

    /// Authenticate and bind the caller's session to the user.
    ///
    /// The session is left untouched on any rejection.
    pub async fn login(
        &self,
        credentials: &Credentials,
        cookie: &dyn SessionCookie,
    ) -> Result<AuthOutcome, Error> {
        let username = credentials.username();
        let record = self
            .within("user lookup", self.directory.find_by_username(username))
            .await?
            .map_err(Self::map_directory_error)?;
        let Some(record) = record else {
            debug!(%username, "login rejected: unknown username");
            return Ok(AuthOutcome::rejected(FieldError::username_unknown()));
        };

        let matches = self
            .within(
                "password verification",
                self.hasher
                    .verify(record.password_hash(), credentials.password()),
            )
            .await?
            .map_err(Self::map_hasher_error)?;
        if !matches {
            debug!(user_id = %record.user().id(), "login rejected: incorrect password");
            return Ok(AuthOutcome::rejected(FieldError::password_incorrect()));
        }

        let user = record.into_user();
        let session = SessionContext::new(cookie, self.sessions.as_ref());
        self.within("session bind", session.set_current_user_id(user.id()))
            .await?
            .map_err(Self::map_session_error)?;
        info!(user_id = %user.id(), "user logged in");
        Ok(AuthOutcome::User(user))
    }

    /// Identity bound to the caller's session.
    ///
    /// No session, an expired session, and a session pointing at a user that
    /// no longer exists all yield `None`.
    pub async fn me(&self, cookie: &dyn SessionCookie) -> Result<Option<User>, Error> {
        let session = SessionContext::new(cookie, self.sessions.as_ref());
        let user_id = self
            .within("session lookup", session.current_user_id())
            .await?
            .map_err(Self::map_session_error)?;
        let Some(user_id) = user_id else {
            return Ok(None);
        };

        let user = self
            .within("user lookup", self.directory.find_by_id(user_id))
            .await?
            .map_err(Self::map_directory_error)?;
        if user.is_none() {
            warn!(%user_id, "session refers to a missing user");
        }
        Ok(user)
    }

    /// Revoke the caller's session. Idempotent.
    pub async fn logout(&self, cookie: &dyn SessionCookie) -> Result<(), Error> {
        let session = SessionContext::new(cookie, self.sessions.as_ref());
        self.within("session revoke", session.clear())
            .await?
            .map_err(Self::map_session_error)?;
        debug!("session cleared");
        Ok(())
    }

    async fn within<F>(&self, operation: &'static str, fut: F) -> Result<F::Output, Error>
    where
        F: Future,
    {
        tokio::time::timeout(self.config.call_timeout, fut)
            .await
            .map_err(|_| {
                warn!(
                    operation,
                    timeout = ?self.config.call_timeout,
                    "dependency call timed out"
                );
                Error::service_unavailable(format!("{operation} timed out"))
            })
    }

    fn map_directory_error(err: UserDirectoryError) -> Error {
        match err {
            UserDirectoryError::Connection { message } => {
                warn!(%message, "user directory unavailable");
                Error::service_unavailable(format!("user directory unavailable: {message}"))
            }
            UserDirectoryError::Query { message } => {
                error!(%message, "user directory query failed");
                Error::internal(format!("user directory error: {message}"))
            }
            UserDirectoryError::DuplicateUsername { username } => {
                error!(%username, "unexpected duplicate username outside insert");
                Error::internal("unexpected user directory conflict")
            }
        }
    }

    fn map_hasher_error(err: CredentialHasherError) -> Error {
        error!(error = %err, "credential hashing failed");
        Error::internal(err.to_string())
    }

    fn map_session_error(err: SessionContextError) -> Error {
        match err {
            SessionContextError::Store(SessionStoreError::Connection { message }) => {
                warn!(%message, "session store unavailable");
                Error::service_unavailable(format!("session store unavailable: {message}"))
            }
            other => {
                error!(error = %other, "session handling failed");
                Error::internal(other.to_string())
            }
        }
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
