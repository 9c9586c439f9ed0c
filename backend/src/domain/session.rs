//! Opaque session tokens and the per-request session binding.
//!
//! A [`SessionToken`] is the only thing handed to the client. The
//! token-to-user mapping lives in a [`SessionStore`]; [`SessionContext`]
//! combines the request's [`SessionCookie`] with that store to answer "who is
//! the current user" and to bind a new one.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;
use tracing::warn;

use super::ports::{SessionCookie, SessionCookieError, SessionStore, SessionStoreError};
use super::UserId;

/// Entropy carried by each token.
const TOKEN_BYTES: usize = 32;
/// Encoded length of [`TOKEN_BYTES`] in unpadded base64.
const TOKEN_ENCODED_LEN: usize = 43;

/// Errors raised when parsing a client-supplied token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionTokenError {
    /// The value has the wrong length.
    #[error("session token must be {expected} characters, got {actual}")]
    Length { expected: usize, actual: usize },
    /// The value contains characters outside the URL-safe alphabet.
    #[error("session token contains invalid characters")]
    Alphabet,
}

/// Opaque, unguessable session token.
///
/// Tokens carry 256 bits of OS randomness encoded as URL-safe base64 without
/// padding. They are redacted from `Debug` output.
///
/// # Examples
/// ```
/// use auth_backend::domain::SessionToken;
///
/// let token = SessionToken::generate();
/// let parsed = SessionToken::parse(token.as_str()).expect("round trip");
/// assert_eq!(parsed, token);
/// assert!(SessionToken::parse("short").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Mint a fresh token from the OS RNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0_u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Validate a token received from a client.
    pub fn parse(raw: &str) -> Result<Self, SessionTokenError> {
        let actual = raw.len();
        if actual != TOKEN_ENCODED_LEN {
            return Err(SessionTokenError::Length {
                expected: TOKEN_ENCODED_LEN,
                actual,
            });
        }
        if !raw
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(SessionTokenError::Alphabet);
        }
        Ok(Self(raw.to_owned()))
    }

    /// Encoded token value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Failures surfaced by [`SessionContext`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionContextError {
    /// The request's token carrier failed.
    #[error(transparent)]
    Cookie(#[from] SessionCookieError),
    /// The session store failed.
    #[error(transparent)]
    Store(#[from] SessionStoreError),
}

/// Per-request view of the caller's session.
///
/// # Examples
/// ```no_run
/// use auth_backend::domain::{SessionContext, UserId};
/// use auth_backend::domain::ports::{SessionCookie, SessionStore};
///
/// async fn bind(cookie: &dyn SessionCookie, store: &dyn SessionStore) {
///     let session = SessionContext::new(cookie, store);
///     let id = UserId::new(1).expect("id");
///     session.set_current_user_id(id).await.expect("bind");
///     assert_eq!(session.current_user_id().await.expect("read"), Some(id));
/// }
/// ```
pub struct SessionContext<'a> {
    cookie: &'a dyn SessionCookie,
    store: &'a dyn SessionStore,
}

impl<'a> SessionContext<'a> {
    /// Combine a token carrier with the backing store.
    pub fn new(cookie: &'a dyn SessionCookie, store: &'a dyn SessionStore) -> Self {
        Self { cookie, store }
    }

    /// User bound to the caller's token, if the binding is still live.
    ///
    /// A token the store no longer knows is dropped from the carrier.
    pub async fn current_user_id(&self) -> Result<Option<UserId>, SessionContextError> {
        let Some(token) = self.cookie.token()? else {
            return Ok(None);
        };
        let resolved = self.store.resolve(&token).await?;
        if resolved.is_none() {
            warn!("session token is unknown or expired; clearing cookie");
            self.cookie.clear();
        }
        Ok(resolved)
    }

    /// Bind the caller to `user_id` under a freshly minted token.
    ///
    /// Any previous token is revoked first. The cookie is written only after
    /// the store accepted the new binding.
    pub async fn set_current_user_id(&self, user_id: UserId) -> Result<(), SessionContextError> {
        if let Some(previous) = self.cookie.token()? {
            self.store.revoke(&previous).await?;
        }
        let token = SessionToken::generate();
        self.store.bind(&token, user_id).await?;
        self.cookie.set_token(&token)?;
        Ok(())
    }

    /// Revoke the caller's binding and empty the carrier.
    pub async fn clear(&self) -> Result<(), SessionContextError> {
        if let Some(token) = self.cookie.token()? {
            self.store.revoke(&token).await?;
        }
        self.cookie.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Unit coverage for token encoding and the session binding flow.
    use super::*;
    use crate::domain::ports::{MockSessionCookie, MockSessionStore};
    use mockall::predicate::eq;
    use rstest::rstest;

    fn user(id: i64) -> UserId {
        UserId::new(id).expect("positive id")
    }

    #[rstest]
    fn generated_tokens_are_unique_and_parseable() {
        let first = SessionToken::generate();
        let second = SessionToken::generate();
        assert_ne!(first, second);
        assert_eq!(first.as_str().len(), TOKEN_ENCODED_LEN);
        assert_eq!(SessionToken::parse(first.as_str()), Ok(first));
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    fn parse_rejects_wrong_length(#[case] raw: &str) {
        assert!(matches!(
            SessionToken::parse(raw),
            Err(SessionTokenError::Length { .. })
        ));
    }

    #[rstest]
    fn parse_rejects_foreign_alphabet() {
        let raw = "+".repeat(TOKEN_ENCODED_LEN);
        assert_eq!(SessionToken::parse(&raw), Err(SessionTokenError::Alphabet));
    }

    #[rstest]
    fn debug_hides_token() {
        let token = SessionToken::generate();
        assert!(!format!("{token:?}").contains(token.as_str()));
    }

    #[rstest]
    #[tokio::test]
    async fn missing_cookie_means_anonymous() {
        let mut cookie = MockSessionCookie::new();
        cookie.expect_token().returning(|| Ok(None));
        let mut store = MockSessionStore::new();
        store.expect_resolve().never();

        let session = SessionContext::new(&cookie, &store);
        assert_eq!(session.current_user_id().await, Ok(None));
    }

    #[rstest]
    #[tokio::test]
    async fn stale_token_is_cleared() {
        let mut cookie = MockSessionCookie::new();
        cookie
            .expect_token()
            .returning(|| Ok(Some(SessionToken::generate())));
        cookie.expect_clear().times(1).return_const(());
        let mut store = MockSessionStore::new();
        store.expect_resolve().returning(|_| Ok(None));

        let session = SessionContext::new(&cookie, &store);
        assert_eq!(session.current_user_id().await, Ok(None));
    }

    #[rstest]
    #[tokio::test]
    async fn set_current_user_revokes_previous_then_binds() {
        let previous = SessionToken::generate();
        let expected_previous = previous.clone();
        let mut cookie = MockSessionCookie::new();
        cookie
            .expect_token()
            .returning(move || Ok(Some(previous.clone())));
        cookie.expect_set_token().times(1).returning(|_| Ok(()));
        let mut store = MockSessionStore::new();
        store
            .expect_revoke()
            .withf(move |token| token == &expected_previous)
            .times(1)
            .returning(|_| Ok(()));
        store
            .expect_bind()
            .with(mockall::predicate::always(), eq(user(7)))
            .times(1)
            .returning(|_, _| Ok(()));

        let session = SessionContext::new(&cookie, &store);
        session
            .set_current_user_id(user(7))
            .await
            .expect("binding succeeds");
    }

    #[rstest]
    #[tokio::test]
    async fn store_failure_leaves_cookie_untouched() {
        let mut cookie = MockSessionCookie::new();
        cookie.expect_token().returning(|| Ok(None));
        cookie.expect_set_token().never();
        let mut store = MockSessionStore::new();
        store
            .expect_bind()
            .returning(|_, _| Err(SessionStoreError::connection("down")));

        let session = SessionContext::new(&cookie, &store);
        let result = session.set_current_user_id(user(1)).await;
        assert!(matches!(result, Err(SessionContextError::Store(_))));
    }
}
