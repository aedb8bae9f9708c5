//! Repository port for task persistence, claiming, and stage updates.

use crate::task::domain::{DecisionWindow, GroupId, Role, StageUpdate, Task, TaskId, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// A user's slot in one stage of one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StageQuery {
    /// Group the tasks belong to.
    pub group_id: GroupId,
    /// User holding or claiming the tasks.
    pub user_id: UserId,
    /// Stage the user works in.
    pub role: Role,
}

impl StageQuery {
    /// Creates a stage query.
    #[must_use]
    pub const fn new(group_id: GroupId, user_id: UserId, role: Role) -> Self {
        Self {
            group_id,
            user_id,
            role,
        }
    }
}

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a newly imported task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns up to `limit` tasks in the role's queue already claimed by the
    /// user.
    async fn find_assigned(
        &self,
        query: StageQuery,
        limit: usize,
    ) -> TaskRepositoryResult<Vec<Task>>;

    /// Atomically claims up to `limit` unassigned tasks from the earliest
    /// batch with unclaimed work in the role's queue.
    ///
    /// Implementations must never hand the same task to two callers and must
    /// leave no partial claim behind on failure. Returns an empty list when
    /// nothing is left to claim.
    async fn claim_next_batch(
        &self,
        query: StageQuery,
        limit: usize,
    ) -> TaskRepositoryResult<Vec<Task>>;

    /// Persists a stage update and returns the stored task.
    ///
    /// Rejection counters are incremented relative to the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn apply_update(&self, id: TaskId, update: &StageUpdate) -> TaskRepositoryResult<Task>;

    /// Returns up to `limit` tasks the user completed for the role, most
    /// recent decision first.
    async fn find_history(
        &self,
        query: StageQuery,
        limit: usize,
    ) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns every task ever assigned to the user for the role, in any
    /// state.
    async fn list_assigned_to(&self, query: StageQuery) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns the group's tasks with any stage decision inside the window,
    /// newest import first.
    async fn find_decided_within(
        &self,
        group_id: GroupId,
        window: DecisionWindow,
    ) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
