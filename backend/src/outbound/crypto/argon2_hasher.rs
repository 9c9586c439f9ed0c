//! Argon2id implementation of the `CredentialHasher` port.
//!
//! Hashing is CPU bound, so both operations run on Tokio's blocking pool. The
//! caller's trace identifier is carried onto the worker so log lines stay
//! correlated.

use argon2::password_hash::{self, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher, PasswordVerifier, Version};
use async_trait::async_trait;
use rand::rngs::OsRng;
use tokio::task;
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::ports::{CredentialHasher, CredentialHasherError};
use crate::domain::{PasswordHash, TraceId};

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Argon2id hasher producing PHC-format strings.
///
/// Verification reads the parameters embedded in the stored hash, so hashes
/// written under older cost settings keep verifying.
///
/// # Examples
/// ```no_run
/// use auth_backend::domain::ports::CredentialHasher;
/// use auth_backend::outbound::crypto::Argon2CredentialHasher;
///
/// # async fn demo() {
/// let hasher = Argon2CredentialHasher::default();
/// let hash = hasher.hash("correct horse").await.expect("hash");
/// assert!(hasher.verify(&hash, "correct horse").await.expect("verify"));
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Argon2CredentialHasher {
    params: Params,
}

impl Default for Argon2CredentialHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl Argon2CredentialHasher {
    /// Build a hasher with explicit cost parameters.
    pub fn with_params(params: Argon2Params) -> Result<Self, CredentialHasherError> {
        let params = Params::new(
            params.memory_kib,
            params.iterations,
            params.parallelism,
            None,
        )
        .map_err(|err| CredentialHasherError::failure(format!("invalid argon2 parameters: {err}")))?;
        Ok(Self { params })
    }

    fn engine(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

fn hash_blocking(engine: &Argon2<'_>, plaintext: &[u8]) -> Result<String, CredentialHasherError> {
    let salt = SaltString::generate(&mut OsRng);
    engine
        .hash_password(plaintext, &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| CredentialHasherError::failure(err.to_string()))
}

fn verify_blocking(
    engine: &Argon2<'_>,
    encoded: &str,
    plaintext: &[u8],
) -> Result<bool, CredentialHasherError> {
    let parsed = argon2::PasswordHash::new(encoded)
        .map_err(|err| CredentialHasherError::malformed_hash(err.to_string()))?;
    match engine.verify_password(plaintext, &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(err) => Err(CredentialHasherError::malformed_hash(err.to_string())),
    }
}

fn join_error(err: task::JoinError) -> CredentialHasherError {
    CredentialHasherError::failure(format!("hashing worker failed: {err}"))
}

#[async_trait]
impl CredentialHasher for Argon2CredentialHasher {
    async fn hash(&self, plaintext: &str) -> Result<PasswordHash, CredentialHasherError> {
        let engine = self.engine();
        let secret = Zeroizing::new(plaintext.as_bytes().to_vec());
        let trace_id = TraceId::current();
        let encoded = task::spawn_blocking(move || {
            TraceId::sync_scope(trace_id, || {
                debug!("hashing password");
                hash_blocking(&engine, &secret)
            })
        })
        .await
        .map_err(join_error)??;
        PasswordHash::new(encoded).map_err(|err| CredentialHasherError::failure(err.to_string()))
    }

    async fn verify(
        &self,
        hash: &PasswordHash,
        plaintext: &str,
    ) -> Result<bool, CredentialHasherError> {
        let engine = self.engine();
        let encoded = hash.as_str().to_owned();
        let secret = Zeroizing::new(plaintext.as_bytes().to_vec());
        let trace_id = TraceId::current();
        task::spawn_blocking(move || {
            TraceId::sync_scope(trace_id, || verify_blocking(&engine, &encoded, &secret))
        })
        .await
        .map_err(join_error)?
    }
}
