//! Port abstraction for the user directory and its errors.
//!
//! The directory owns username uniqueness. `insert` must check and write in
//! one atomic step so that two concurrent registrations for the same name
//! cannot both succeed.

use async_trait::async_trait;

use crate::domain::{NewUser, User, UserId, UserRecord, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user directory adapters.
    pub enum UserDirectoryError {
        /// The username is already taken; raised by `insert` only.
        DuplicateUsername { username: String } => "username already taken: {username}",
        /// Directory connection could not be established.
        Connection { message: String } => "user directory connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user directory query failed: {message}",
    }
}

/// Lookup and creation of user records keyed by unique username.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch the stored record for `username`, hash included.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserRecord>, UserDirectoryError>;

    /// Fetch the public identity for `id`.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserDirectoryError>;

    /// Insert a user, allocating its identifier.
    ///
    /// Fails with [`UserDirectoryError::DuplicateUsername`] when the name is
    /// taken, including when a concurrent insert won the race.
    async fn insert(&self, user: NewUser) -> Result<User, UserDirectoryError>;
}
