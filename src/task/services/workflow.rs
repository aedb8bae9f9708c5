//! Entry points called by the user interface.

use super::{
    allocation::TaskAllocationService,
    error::{MissingEntity, WorkflowError, WorkflowResult, bounded},
    export::TaskExportService,
    history::TaskHistoryService,
    update::{TaskUpdateService, UpdateOutcome, UpdateTaskRequest},
};
use crate::config::WorkflowConfig;
use crate::task::{
    domain::{GroupId, GroupPayPolicy, ProgressStats, Role, Task, User, UserId},
    ports::{StageQuery, TaskRepository, TaskViewCache, UserDirectory},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;

/// Everything a user's landing page needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWorkspace {
    /// Current working set.
    pub tasks: Vec<Task>,
    /// The signed-in user.
    pub user: User,
    /// Recently completed tasks.
    pub history: Vec<Task>,
    /// Lifetime progress for the user's role.
    pub progress: ProgressStats,
}

/// Facade composing allocation, updates, history and export.
#[derive(Clone)]
pub struct WorkflowService<R, D, V, C>
where
    R: TaskRepository,
    D: UserDirectory,
    V: TaskViewCache,
    C: Clock + Send + Sync,
{
    directory: Arc<D>,
    allocation: TaskAllocationService<R>,
    updates: TaskUpdateService<R, V, C>,
    history: TaskHistoryService<R, V>,
    export: TaskExportService<R, D>,
    pay_policy: GroupPayPolicy,
    store_timeout: Duration,
}

impl<R, D, V, C> WorkflowService<R, D, V, C>
where
    R: TaskRepository,
    D: UserDirectory,
    V: TaskViewCache,
    C: Clock + Send + Sync,
{
    /// Wires the workflow services over shared adapters.
    #[must_use]
    pub fn new(
        repository: Arc<R>,
        directory: Arc<D>,
        cache: Arc<V>,
        clock: Arc<C>,
        config: &WorkflowConfig,
    ) -> Self {
        Self {
            allocation: TaskAllocationService::new(Arc::clone(&repository), config),
            updates: TaskUpdateService::new(
                Arc::clone(&repository),
                Arc::clone(&cache),
                clock,
                config,
            ),
            history: TaskHistoryService::new(Arc::clone(&repository), cache, config),
            export: TaskExportService::new(repository, Arc::clone(&directory), config),
            directory,
            pay_policy: config.pay_policy(),
            store_timeout: config.store_timeout(),
        }
    }

    /// Loads the user by email with their working set, history and
    /// progress. Claims a fresh batch when the working set is empty.
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::NotFound`] when no account uses the email.
    /// - [`WorkflowError::AssignmentFailure`] when the lookup or claim fails.
    /// - [`WorkflowError::ReadFailure`] when history or progress fails.
    pub async fn get_user_task(&self, email: &str) -> WorkflowResult<UserWorkspace> {
        let user = bounded(self.store_timeout, self.directory.find_by_email(email))
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "user lookup failed");
                WorkflowError::AssignmentFailure(err)
            })?
            .ok_or_else(|| WorkflowError::NotFound(MissingEntity::User(email.to_owned())))?;

        let query = StageQuery::new(user.group_id(), user.id(), user.role());
        let tasks = self.allocation.get_or_assign(query).await?;
        let history = self.history.history(query).await?;
        let progress = self.history.progress(query).await?;
        Ok(UserWorkspace {
            tasks,
            user,
            history,
            progress,
        })
    }

    /// Returns the user's working set, claiming more when it is empty.
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::InvalidRole`] when `role` names no known role.
    /// - [`WorkflowError::AssignmentFailure`] when the store fails.
    pub async fn get_tasks_or_assign_more(
        &self,
        group_id: GroupId,
        user_id: UserId,
        role: &str,
    ) -> WorkflowResult<Vec<Task>> {
        let parsed =
            Role::try_from(role).map_err(|_| WorkflowError::InvalidRole(role.to_owned()))?;
        self.allocation
            .get_or_assign(StageQuery::new(group_id, user_id, parsed))
            .await
    }

    /// Applies a stage decision.
    ///
    /// # Errors
    ///
    /// See [`TaskUpdateService::apply`].
    pub async fn update_task(&self, request: UpdateTaskRequest) -> WorkflowResult<UpdateOutcome> {
        self.updates.apply(request).await
    }

    /// Returns the user's recently completed tasks for the role.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::ReadFailure`] when the store fails.
    pub async fn get_user_history(
        &self,
        user_id: UserId,
        group_id: GroupId,
        role: Role,
    ) -> WorkflowResult<Vec<Task>> {
        self.history
            .history(StageQuery::new(group_id, user_id, role))
            .await
    }

    /// Returns the user's lifetime progress for the role.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::ReadFailure`] when the store fails.
    pub async fn get_user_progress(
        &self,
        user_id: UserId,
        group_id: GroupId,
        role: Role,
    ) -> WorkflowResult<ProgressStats> {
        self.history
            .progress(StageQuery::new(group_id, user_id, role))
            .await
    }

    /// Exports the group's tasks decided inside `[from, to]`.
    ///
    /// # Errors
    ///
    /// See [`TaskExportService::export`].
    pub async fn export_tasks(
        &self,
        requester: &User,
        group_id: GroupId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> WorkflowResult<String> {
        self.export.export(requester, group_id, from, to).await
    }

    /// Returns the pay policy for the configured groups.
    #[must_use]
    pub const fn pay_policy(&self) -> &GroupPayPolicy {
        &self.pay_policy
    }
}
