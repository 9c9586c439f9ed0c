//! User data model.
//!
//! [`User`] is the public identity returned by every auth operation.
//! [`UserRecord`] pairs it with the stored [`PasswordHash`] and only crosses
//! the user directory port.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Identifiers are allocated from 1 upwards.
    NonPositiveId,
    /// The stored password hash was blank.
    EmptyPasswordHash,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveId => write!(f, "user id must be a positive integer"),
            Self::EmptyPasswordHash => write!(f, "password hash must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Directory-assigned user identifier.
///
/// # Examples
/// ```
/// use auth_backend::domain::UserId;
///
/// let id = UserId::new(1).expect("positive id");
/// assert_eq!(id.get(), 1);
/// assert!(UserId::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: i64) -> Result<Self, UserValidationError> {
        if id <= 0 {
            return Err(UserValidationError::NonPositiveId);
        }
        Ok(Self(id))
    }

    /// Raw integer value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for i64 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<i64> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Login name, unique across the directory.
///
/// No syntactic rules apply here: lookups run on raw input before the
/// credential validator sees it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Wrap a raw username.
    pub fn new(username: impl Into<String>) -> Self {
        Self(username.into())
    }

    /// Borrow the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One-way password hash in PHC string format.
///
/// Never serialised and redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash produced by a credential hasher.
    pub fn new(encoded: impl Into<String>) -> Result<Self, UserValidationError> {
        let encoded = encoded.into();
        if encoded.trim().is_empty() {
            return Err(UserValidationError::EmptyPasswordHash);
        }
        Ok(Self(encoded))
    }

    /// Encoded hash string for storage and verification.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Application user.
///
/// ## Invariants
/// - `id` is positive and immutable once assigned.
/// - `username` is unique across the directory.
///
/// # Examples
/// ```
/// use auth_backend::domain::{User, UserId, Username};
///
/// let user = User::new(UserId::new(1).expect("id"), Username::new("alice"));
/// let json = serde_json::to_value(&user).expect("serialise");
/// assert_eq!(json, serde_json::json!({ "id": 1, "username": "alice" }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct User {
    #[schema(value_type = i64, example = 1)]
    id: UserId,
    #[schema(value_type = String, example = "alice")]
    username: Username,
}

impl User {
    /// Build a new [`User`] from validated components.
    pub fn new(id: UserId, username: Username) -> Self {
        Self { id, username }
    }

    /// Stable user identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Login name.
    pub fn username(&self) -> &Username {
        &self.username
    }
}

/// Stored user: identity plus credential hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    user: User,
    password_hash: PasswordHash,
}

impl UserRecord {
    /// Pair an identity with its stored hash.
    pub fn new(user: User, password_hash: PasswordHash) -> Self {
        Self {
            user,
            password_hash,
        }
    }

    /// Public identity of the record.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Stored password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Drop the hash and keep the public identity.
    pub fn into_user(self) -> User {
        self.user
    }
}

/// User awaiting insertion; the directory assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    username: Username,
    password_hash: PasswordHash,
}

impl NewUser {
    /// Bundle the fields required for insertion.
    pub fn new(username: Username, password_hash: PasswordHash) -> Self {
        Self {
            username,
            password_hash,
        }
    }

    /// Requested login name.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Hash to persist.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Complete the record once an identifier has been allocated.
    pub fn into_record(self, id: UserId) -> UserRecord {
        UserRecord::new(User::new(id, self.username), self.password_hash)
    }
}

#[cfg(test)]
mod tests;
