//! Applies a role's decision to a task.

use super::error::{MissingEntity, StoreFailure, WorkflowError, WorkflowResult, bounded};
use crate::config::WorkflowConfig;
use crate::task::{
    domain::{
        EditedFields, Role, StageDecision, StageUpdate, Task, TaskAction, TaskDomainError,
        TaskId, format_elapsed,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskViewCache},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;

/// Decision submitted from an editing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    action: String,
    task_id: TaskId,
    role: Role,
    edited: EditedFields,
    stage_entered_at: DateTime<Utc>,
}

impl UpdateTaskRequest {
    /// Creates a request.
    ///
    /// `action` is parsed leniently; unknown names leave the task in its
    /// current queue. `stage_entered_at` is when the user opened the task.
    #[must_use]
    pub fn new(
        action: impl Into<String>,
        task_id: TaskId,
        role: Role,
        edited: EditedFields,
        stage_entered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            action: action.into(),
            task_id,
            role,
            edited,
            stage_entered_at,
        }
    }

    /// Returns the target task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the acting role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }
}

/// Result of an applied decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Confirmation shown to the user.
    pub message: String,
    /// Task as persisted.
    pub task: Task,
}

/// Validates, transitions and persists stage decisions.
#[derive(Clone)]
pub struct TaskUpdateService<R, V, C>
where
    R: TaskRepository,
    V: TaskViewCache,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    cache: Arc<V>,
    clock: Arc<C>,
    store_timeout: Duration,
}

impl<R, V, C> TaskUpdateService<R, V, C>
where
    R: TaskRepository,
    V: TaskViewCache,
    C: Clock + Send + Sync,
{
    /// Creates an update service.
    #[must_use]
    pub fn new(repository: Arc<R>, cache: Arc<V>, clock: Arc<C>, config: &WorkflowConfig) -> Self {
        Self {
            repository,
            cache,
            clock,
            store_timeout: config.store_timeout(),
        }
    }

    /// Applies the decision and returns the confirmation message with the
    /// stored task.
    ///
    /// Validation runs before anything is written. On success the group's
    /// cached views are dropped.
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::NotFound`] when the task does not exist.
    /// - [`WorkflowError::ValidationFailure`] when the task is outside the
    ///   role's queue or the decision is incomplete.
    /// - [`WorkflowError::UpdateFailure`] when the store fails or times out.
    pub async fn apply(&self, request: UpdateTaskRequest) -> WorkflowResult<UpdateOutcome> {
        let UpdateTaskRequest {
            action,
            task_id,
            role,
            edited,
            stage_entered_at,
        } = request;

        let task = self.load(task_id).await?;
        if task.state() != role.owner_state() {
            return Err(TaskDomainError::StageMismatch {
                task_id,
                role,
                state: task.state(),
            }
            .into());
        }

        let parsed = TaskAction::parse(&action);
        let output = edited.resolve_output(&task, role, parsed)?;
        let new_state = role.next_state(parsed);
        let now = self.clock.utc();
        let duration =
            (new_state == role.forward_state()).then(|| format_elapsed(now - stage_entered_at));
        let update = StageUpdate::from_decision(StageDecision {
            role,
            new_state,
            verdict: edited.is_correct,
            output,
            decided_at: now,
            duration,
        });

        let stored = bounded(self.store_timeout, self.repository.apply_update(task_id, &update))
            .await
            .map_err(|err| update_failure(task_id, role, err))?;
        self.cache.invalidate_group(stored.group_id());

        tracing::info!(
            task_id = %task_id,
            group_id = %stored.group_id(),
            role = %role,
            action = parsed.map_or("none", TaskAction::as_str),
            from = %task.state(),
            to = %stored.state(),
            rejection = update.is_rejection(),
            "task updated"
        );

        Ok(UpdateOutcome {
            message: TaskAction::success_message(parsed).to_owned(),
            task: stored,
        })
    }

    async fn load(&self, task_id: TaskId) -> WorkflowResult<Task> {
        bounded(self.store_timeout, self.repository.find_by_id(task_id))
            .await
            .map_err(|err| {
                tracing::warn!(task_id = %task_id, error = %err, "task lookup failed");
                WorkflowError::UpdateFailure(err)
            })?
            .ok_or(WorkflowError::NotFound(MissingEntity::Task(task_id)))
    }
}

fn update_failure(task_id: TaskId, role: Role, cause: StoreFailure) -> WorkflowError {
    if let StoreFailure::Repository(TaskRepositoryError::NotFound(_)) = cause {
        return WorkflowError::NotFound(MissingEntity::Task(task_id));
    }
    tracing::warn!(task_id = %task_id, role = %role, error = %cause, "task update failed");
    WorkflowError::UpdateFailure(cause)
}
