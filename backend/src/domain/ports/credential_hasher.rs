//! Port for one-way password hashing.

use async_trait::async_trait;

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential hasher adapters.
    pub enum CredentialHasherError {
        /// The stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
        /// Hashing itself failed (parameters, entropy, worker pool).
        Failure { message: String } => "password hashing failed: {message}",
    }
}

/// Salted one-way hashing and verification of plaintext passwords.
///
/// Implementations must not block the async executor; CPU-heavy work belongs
/// on the blocking pool.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Hash `plaintext` with a fresh salt.
    async fn hash(&self, plaintext: &str) -> Result<PasswordHash, CredentialHasherError>;

    /// Check `plaintext` against `hash`.
    ///
    /// Returns `Ok(false)` on mismatch and an error only when `hash` cannot be
    /// interpreted.
    async fn verify(
        &self,
        hash: &PasswordHash,
        plaintext: &str,
    ) -> Result<bool, CredentialHasherError>;
}
