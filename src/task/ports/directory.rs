//! User directory port resolving annotator accounts and groups.

use crate::task::domain::{Group, GroupId, User, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for user directory lookups.
pub type UserDirectoryResult<T> = Result<T, UserDirectoryError>;

/// Read-only view of annotator accounts.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Finds a user by unique email.
    ///
    /// Returns `None` when no account uses the email.
    async fn find_by_email(&self, email: &str) -> UserDirectoryResult<Option<User>>;

    /// Finds a user by identifier.
    async fn find_by_id(&self, id: UserId) -> UserDirectoryResult<Option<User>>;

    /// Finds a group by identifier.
    async fn find_group(&self, id: GroupId) -> UserDirectoryResult<Option<Group>>;
}

/// Errors returned by user directory implementations.
#[derive(Debug, Clone, Error)]
pub enum UserDirectoryError {
    /// Another account already uses the email.
    #[error("duplicate user email: {0}")]
    DuplicateEmail(String),

    /// Persistence-layer failure.
    #[error("user directory error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserDirectoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
