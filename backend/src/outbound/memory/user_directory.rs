//! `UserDirectory` backed by process memory.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{UserDirectory, UserDirectoryError};
use crate::domain::{NewUser, User, UserId, UserRecord, Username};

#[derive(Default)]
struct DirectoryState {
    by_username: HashMap<Username, UserRecord>,
    usernames: HashMap<UserId, Username>,
    last_id: i64,
}

/// Directory keeping users in a map; identifiers count up from 1.
///
/// The uniqueness check and the insert happen under one write lock.
#[derive(Default)]
pub struct MemoryUserDirectory {
    state: RwLock<DirectoryState>,
}

impl MemoryUserDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.state.read().await.by_username.len()
    }

    /// Whether the directory holds no users.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserRecord>, UserDirectoryError> {
        Ok(self.state.read().await.by_username.get(username).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserDirectoryError> {
        let state = self.state.read().await;
        Ok(state
            .usernames
            .get(&id)
            .and_then(|name| state.by_username.get(name))
            .map(|record| record.user().clone()))
    }

    async fn insert(&self, user: NewUser) -> Result<User, UserDirectoryError> {
        let mut state = self.state.write().await;
        if state.by_username.contains_key(user.username()) {
            return Err(UserDirectoryError::duplicate_username(
                user.username().as_str(),
            ));
        }

        let next = state
            .last_id
            .checked_add(1)
            .ok_or_else(|| UserDirectoryError::query("user id space exhausted"))?;
        let id = UserId::new(next).map_err(|err| UserDirectoryError::query(err.to_string()))?;
        state.last_id = next;

        let record = user.into_record(id);
        let created = record.user().clone();
        state.usernames.insert(id, created.username().clone());
        state.by_username.insert(created.username().clone(), record);
        Ok(created)
    }
}
