//! Shared fixtures for task unit tests.

use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{BatchId, DecisionWindow, GroupId, StageUpdate, Task, TaskId},
    ports::{StageQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use std::sync::Mutex;

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct TestClock {
    now: Mutex<DateTime<Utc>>,
}

impl TestClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().expect("clock lock");
        *now += delta;
    }
}

impl Default for TestClock {
    fn default() -> Self {
        Self::at(epoch())
    }
}

impl Clock for TestClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub fn new_task(id: i64, group: i64, batch: &str, clock: &TestClock) -> Task {
    Task::new(
        TaskId::new(id),
        GroupId::new(group),
        BatchId::new(batch),
        format!("diplomatic text {id}"),
        Some(format!("normalised text {id}")),
        clock,
    )
}

pub async fn seed(
    repository: &InMemoryTaskRepository,
    tasks: impl IntoIterator<Item = Task>,
) -> eyre::Result<()> {
    for task in tasks {
        repository.store(&task).await?;
    }
    Ok(())
}

mockall::mock! {
    pub Repository {}

    #[async_trait::async_trait]
    impl TaskRepository for Repository {
        async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;
        async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;
        async fn find_assigned(
            &self,
            query: StageQuery,
            limit: usize,
        ) -> TaskRepositoryResult<Vec<Task>>;
        async fn claim_next_batch(
            &self,
            query: StageQuery,
            limit: usize,
        ) -> TaskRepositoryResult<Vec<Task>>;
        async fn apply_update(
            &self,
            id: TaskId,
            update: &StageUpdate,
        ) -> TaskRepositoryResult<Task>;
        async fn find_history(
            &self,
            query: StageQuery,
            limit: usize,
        ) -> TaskRepositoryResult<Vec<Task>>;
        async fn list_assigned_to(&self, query: StageQuery) -> TaskRepositoryResult<Vec<Task>>;
        async fn find_decided_within(
            &self,
            group_id: GroupId,
            window: DecisionWindow,
        ) -> TaskRepositoryResult<Vec<Task>>;
    }
}

pub fn connection_lost() -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other("connection lost"))
}

/// Repository whose calls never complete.
#[derive(Debug, Default)]
pub struct StalledRepository;

#[async_trait::async_trait]
impl TaskRepository for StalledRepository {
    async fn store(&self, _task: &Task) -> TaskRepositoryResult<()> {
        std::future::pending().await
    }

    async fn find_by_id(&self, _id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        std::future::pending().await
    }

    async fn find_assigned(
        &self,
        _query: StageQuery,
        _limit: usize,
    ) -> TaskRepositoryResult<Vec<Task>> {
        std::future::pending().await
    }

    async fn claim_next_batch(
        &self,
        _query: StageQuery,
        _limit: usize,
    ) -> TaskRepositoryResult<Vec<Task>> {
        std::future::pending().await
    }

    async fn apply_update(&self, _id: TaskId, _update: &StageUpdate) -> TaskRepositoryResult<Task> {
        std::future::pending().await
    }

    async fn find_history(
        &self,
        _query: StageQuery,
        _limit: usize,
    ) -> TaskRepositoryResult<Vec<Task>> {
        std::future::pending().await
    }

    async fn list_assigned_to(&self, _query: StageQuery) -> TaskRepositoryResult<Vec<Task>> {
        std::future::pending().await
    }

    async fn find_decided_within(
        &self,
        _group_id: GroupId,
        _window: DecisionWindow,
    ) -> TaskRepositoryResult<Vec<Task>> {
        std::future::pending().await
    }
}
