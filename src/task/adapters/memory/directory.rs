//! In-memory user directory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Group, GroupId, User, UserId},
    ports::{UserDirectory, UserDirectoryError, UserDirectoryResult},
};

/// Thread-safe in-memory directory of users and groups.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    users: HashMap<UserId, User>,
    email_index: HashMap<String, UserId>,
    groups: HashMap<GroupId, Group>,
}

fn lock_error(message: String) -> UserDirectoryError {
    UserDirectoryError::persistence(std::io::Error::other(message))
}

/// Emails are matched case-insensitively.
fn email_key(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

impl InMemoryUserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a group.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Persistence`] when the lock is poisoned.
    pub fn insert_group(&self, group: Group) -> UserDirectoryResult<()> {
        let mut state = self.state.write().map_err(|err| lock_error(err.to_string()))?;
        state.groups.insert(group.id(), group);
        Ok(())
    }

    /// Adds a user.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::DuplicateEmail`] when the email is taken.
    pub fn insert_user(&self, user: User) -> UserDirectoryResult<()> {
        let mut state = self.state.write().map_err(|err| lock_error(err.to_string()))?;
        let key = email_key(user.email());
        if state.email_index.contains_key(&key) {
            return Err(UserDirectoryError::DuplicateEmail(user.email().to_owned()));
        }
        state.email_index.insert(key, user.id());
        state.users.insert(user.id(), user);
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_email(&self, email: &str) -> UserDirectoryResult<Option<User>> {
        let state = self.state.read().map_err(|err| lock_error(err.to_string()))?;
        Ok(state
            .email_index
            .get(&email_key(email))
            .and_then(|user_id| state.users.get(user_id))
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> UserDirectoryResult<Option<User>> {
        let state = self.state.read().map_err(|err| lock_error(err.to_string()))?;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_group(&self, id: GroupId) -> UserDirectoryResult<Option<Group>> {
        let state = self.state.read().map_err(|err| lock_error(err.to_string()))?;
        Ok(state.groups.get(&id).cloned())
    }
}
