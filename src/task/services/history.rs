//! Read-only history and progress summaries.

use super::error::{StoreFailure, WorkflowError, WorkflowResult, bounded};
use crate::config::WorkflowConfig;
use crate::task::{
    domain::{ProgressStats, Task},
    ports::{StageQuery, TaskRepository, TaskViewCache},
};
use std::sync::Arc;
use std::time::Duration;

/// Serves completed-work listings through the view cache.
#[derive(Clone)]
pub struct TaskHistoryService<R, V>
where
    R: TaskRepository,
    V: TaskViewCache,
{
    repository: Arc<R>,
    cache: Arc<V>,
    history_size: usize,
    store_timeout: Duration,
}

impl<R, V> TaskHistoryService<R, V>
where
    R: TaskRepository,
    V: TaskViewCache,
{
    /// Creates a history service.
    #[must_use]
    pub fn new(repository: Arc<R>, cache: Arc<V>, config: &WorkflowConfig) -> Self {
        Self {
            repository,
            cache,
            history_size: config.history_size,
            store_timeout: config.store_timeout(),
        }
    }

    /// Returns the user's most recently completed tasks for the role.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::ReadFailure`] when the store fails or times
    /// out.
    pub async fn history(&self, query: StageQuery) -> WorkflowResult<Vec<Task>> {
        if let Some(cached) = self.cache.history(query) {
            return Ok(cached);
        }
        let generation = self.cache.generation(query.group_id);
        let tasks = bounded(
            self.store_timeout,
            self.repository.find_history(query, self.history_size),
        )
        .await
        .map_err(|err| read_failure(query, err))?;
        self.cache.store_history(query, generation, tasks.clone());
        Ok(tasks)
    }

    /// Summarises everything the user was ever assigned for the role.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::ReadFailure`] when the store fails or times
    /// out.
    pub async fn progress(&self, query: StageQuery) -> WorkflowResult<ProgressStats> {
        let assigned = bounded(self.store_timeout, self.repository.list_assigned_to(query))
            .await
            .map_err(|err| read_failure(query, err))?;
        Ok(ProgressStats::tally(query.role, &assigned))
    }
}

fn read_failure(query: StageQuery, cause: StoreFailure) -> WorkflowError {
    tracing::warn!(
        group_id = %query.group_id,
        user_id = %query.user_id,
        role = %query.role,
        error = %cause,
        "history read failed"
    );
    WorkflowError::ReadFailure(cause)
}
