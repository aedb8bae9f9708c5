//! In-memory task repository for tests and embedded use.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{DecisionWindow, GroupId, StageUpdate, Task, TaskId, earliest_batch},
    ports::{StageQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// Claims hold the write lock across selection and assignment, which makes
/// them atomic with respect to concurrent claimers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
}

impl InMemoryTaskState {
    fn in_group(&self, group_id: GroupId) -> impl Iterator<Item = &Task> {
        self.tasks
            .values()
            .filter(move |task| task.group_id() == group_id)
    }
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

/// Orders a working set by batch, then by task identifier.
fn sort_by_batch(tasks: &mut [Task]) {
    tasks.sort_by(|left, right| {
        left.batch_id()
            .cmp(right.batch_id())
            .then_with(|| left.id().cmp(&right.id()))
    });
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_assigned(
        &self,
        query: StageQuery,
        limit: usize,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        let owner_state = query.role.owner_state();
        let mut tasks: Vec<Task> = state
            .in_group(query.group_id)
            .filter(|task| {
                task.state() == owner_state && task.assignee(query.role) == Some(query.user_id)
            })
            .cloned()
            .collect();
        sort_by_batch(&mut tasks);
        tasks.truncate(limit);
        Ok(tasks)
    }

    async fn claim_next_batch(
        &self,
        query: StageQuery,
        limit: usize,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let mut state = self.write()?;
        let owner_state = query.role.owner_state();
        let unclaimed: Vec<&Task> = state
            .in_group(query.group_id)
            .filter(|task| task.state() == owner_state && task.assignee(query.role).is_none())
            .collect();
        let Some(batch_id) = earliest_batch(unclaimed.iter().map(|task| task.batch_id())).cloned()
        else {
            return Ok(Vec::new());
        };

        let mut task_ids: Vec<TaskId> = unclaimed
            .iter()
            .filter(|task| task.batch_id() == &batch_id)
            .map(|task| task.id())
            .collect();
        task_ids.sort_unstable();
        task_ids.truncate(limit);

        let mut claimed = Vec::with_capacity(task_ids.len());
        for task_id in task_ids {
            if let Some(task) = state.tasks.get_mut(&task_id)
                && task.claim(query.role, query.user_id)
            {
                claimed.push(task.clone());
            }
        }
        Ok(claimed)
    }

    async fn apply_update(&self, id: TaskId, update: &StageUpdate) -> TaskRepositoryResult<Task> {
        let mut state = self.write()?;
        let task = state
            .tasks
            .get_mut(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        task.apply(update);
        Ok(task.clone())
    }

    async fn find_history(
        &self,
        query: StageQuery,
        limit: usize,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        let completed_states = query.role.history_states();
        let mut tasks: Vec<Task> = state
            .in_group(query.group_id)
            .filter(|task| {
                completed_states.contains(&task.state())
                    && task.assignee(query.role) == Some(query.user_id)
            })
            .cloned()
            .collect();
        tasks.sort_by(|left, right| {
            right
                .decided_at(query.role)
                .cmp(&left.decided_at(query.role))
                .then_with(|| right.id().cmp(&left.id()))
        });
        tasks.truncate(limit);
        Ok(tasks)
    }

    async fn list_assigned_to(&self, query: StageQuery) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        let mut tasks: Vec<Task> = state
            .in_group(query.group_id)
            .filter(|task| task.assignee(query.role) == Some(query.user_id))
            .cloned()
            .collect();
        tasks.sort_by_key(Task::id);
        Ok(tasks)
    }

    async fn find_decided_within(
        &self,
        group_id: GroupId,
        window: DecisionWindow,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        let mut tasks: Vec<Task> = state
            .in_group(group_id)
            .filter(|task| window.matches(task))
            .cloned()
            .collect();
        tasks.sort_by(|left, right| {
            right
                .created_at()
                .cmp(&left.created_at())
                .then_with(|| right.id().cmp(&left.id()))
        });
        Ok(tasks)
    }
}
