//! Service-boundary errors shared by the workflow services.

use crate::task::{
    domain::{Role, TaskDomainError, TaskId},
    ports::{TaskRepositoryError, UserDirectoryError},
};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Result type for workflow service operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Underlying cause of a retryable store failure.
#[derive(Debug, Clone, Error)]
pub enum StoreFailure {
    /// The task repository reported an error.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),

    /// The user directory reported an error.
    #[error(transparent)]
    Directory(#[from] UserDirectoryError),

    /// The store did not answer within the configured bound.
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),
}

/// Entity a lookup failed to find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingEntity {
    /// No account uses the email.
    User(String),
    /// No task has the identifier.
    Task(TaskId),
}

impl fmt::Display for MissingEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(email) => write!(f, "no user with email {email}"),
            Self::Task(task_id) => write!(f, "no task with id {task_id}"),
        }
    }
}

/// Errors surfaced to callers of the workflow services.
#[derive(Debug, Clone, Error)]
pub enum WorkflowError {
    /// The role string names no known role.
    #[error("invalid role provided: {0}")]
    InvalidRole(String),

    /// A user or task lookup came back empty.
    #[error("{0}")]
    NotFound(MissingEntity),

    /// Reading or claiming a working set failed.
    #[error("failed to retrieve or assign tasks: {0}")]
    AssignmentFailure(#[source] StoreFailure),

    /// Persisting a decision failed.
    #[error("failed to update task: {0}")]
    UpdateFailure(#[source] StoreFailure),

    /// The decision or request was rejected before persistence.
    #[error(transparent)]
    ValidationFailure(#[from] TaskDomainError),

    /// The requester's role may not perform the operation.
    #[error("{role} may not export tasks")]
    AccessDenied {
        /// Requester role.
        role: Role,
    },

    /// Reading history, progress or export data failed.
    #[error("failed to read task data: {0}")]
    ReadFailure(#[source] StoreFailure),
}

impl WorkflowError {
    /// Returns `true` when repeating the call may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::AssignmentFailure(_) | Self::UpdateFailure(_) | Self::ReadFailure(_)
        )
    }

    /// Returns the message shown to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidRole(role) => format!("Invalid role provided: {role}"),
            Self::NotFound(MissingEntity::User(_)) => {
                "No user found with the provided email".to_owned()
            }
            Self::NotFound(MissingEntity::Task(_)) => "Task not found".to_owned(),
            Self::AssignmentFailure(_) => "Failed to retrieve or assign tasks".to_owned(),
            Self::UpdateFailure(_) => "Error updating task".to_owned(),
            Self::ValidationFailure(err) => err.to_string(),
            Self::AccessDenied { .. } => "Export is restricted to reviewers".to_owned(),
            Self::ReadFailure(_) => "Failed fetching user history".to_owned(),
        }
    }
}

/// Awaits a store call, failing with [`StoreFailure::Timeout`] once `limit`
/// elapses.
pub(crate) async fn bounded<T, E>(
    limit: Duration,
    call: impl Future<Output = Result<T, E>>,
) -> Result<T, StoreFailure>
where
    StoreFailure: From<E>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(StoreFailure::from),
        Err(_) => Err(StoreFailure::Timeout(limit)),
    }
}
