//! Working-set lookup and batch claiming.

use super::error::{StoreFailure, WorkflowError, WorkflowResult, bounded};
use crate::config::WorkflowConfig;
use crate::task::{
    domain::Task,
    ports::{StageQuery, TaskRepository},
};
use std::sync::Arc;
use std::time::Duration;

/// Hands users their working set, claiming a fresh batch when it is empty.
#[derive(Clone)]
pub struct TaskAllocationService<R>
where
    R: TaskRepository,
{
    repository: Arc<R>,
    page_size: usize,
    store_timeout: Duration,
}

impl<R> TaskAllocationService<R>
where
    R: TaskRepository,
{
    /// Creates an allocation service.
    #[must_use]
    pub fn new(repository: Arc<R>, config: &WorkflowConfig) -> Self {
        Self {
            repository,
            page_size: config.page_size,
            store_timeout: config.store_timeout(),
        }
    }

    /// Returns the user's open tasks for the role, or claims up to a page of
    /// unassigned tasks from the earliest batch when they hold none.
    ///
    /// An empty list means the queue is drained.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::AssignmentFailure`] when the store fails or
    /// times out. A failed claim leaves no task assigned.
    pub async fn get_or_assign(&self, query: StageQuery) -> WorkflowResult<Vec<Task>> {
        let assigned = bounded(
            self.store_timeout,
            self.repository.find_assigned(query, self.page_size),
        )
        .await
        .map_err(|err| assignment_failure(query, err))?;
        if !assigned.is_empty() {
            tracing::debug!(
                group_id = %query.group_id,
                user_id = %query.user_id,
                role = %query.role,
                count = assigned.len(),
                "returning existing working set"
            );
            return Ok(assigned);
        }

        let claimed = bounded(
            self.store_timeout,
            self.repository.claim_next_batch(query, self.page_size),
        )
        .await
        .map_err(|err| assignment_failure(query, err))?;
        if claimed.is_empty() {
            tracing::info!(
                group_id = %query.group_id,
                user_id = %query.user_id,
                role = %query.role,
                "no unassigned tasks left to claim"
            );
        } else {
            tracing::info!(
                group_id = %query.group_id,
                user_id = %query.user_id,
                role = %query.role,
                batch_id = claimed.first().map_or("", |task| task.batch_id().as_str()),
                count = claimed.len(),
                "claimed tasks"
            );
        }
        Ok(claimed)
    }
}

fn assignment_failure(query: StageQuery, cause: StoreFailure) -> WorkflowError {
    tracing::warn!(
        group_id = %query.group_id,
        user_id = %query.user_id,
        role = %query.role,
        error = %cause,
        "task allocation failed"
    );
    WorkflowError::AssignmentFailure(cause)
}
