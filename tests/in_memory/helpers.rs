//! Shared test helpers for in-memory workflow integration tests.

use chrono::Utc;
use mockable::DefaultClock;
use rstest::fixture;
use scriptorium::config::WorkflowConfig;
use scriptorium::task::{
    adapters::memory::{InMemoryTaskRepository, InMemoryTaskViewCache, InMemoryUserDirectory},
    domain::{BatchId, EditedFields, Group, GroupId, Role, Task, TaskId, User, UserId},
    ports::TaskRepository,
    services::{UpdateOutcome, UpdateTaskRequest, WorkflowResult, WorkflowService},
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Workflow facade over in-memory adapters.
pub type TestWorkflow = WorkflowService<
    InMemoryTaskRepository,
    InMemoryUserDirectory,
    InMemoryTaskViewCache,
    DefaultClock,
>;

/// Group the seeded staff belong to.
pub const LATIN: GroupId = GroupId::new(1);

/// Group with a single transcriber and no shared work.
pub const GREEK: GroupId = GroupId::new(2);

/// Wired stores and the facade under test.
pub struct Harness {
    pub repository: Arc<InMemoryTaskRepository>,
    pub workflow: TestWorkflow,
    pub transcriber: User,
    pub second_transcriber: User,
    pub reviewer: User,
    pub final_reviewer: User,
    pub greek_transcriber: User,
}

impl Harness {
    /// Builds a harness with seeded groups and staff.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory rejects a seed record.
    pub fn new() -> eyre::Result<Self> {
        let repository = Arc::new(InMemoryTaskRepository::new());
        let directory = Arc::new(InMemoryUserDirectory::new());
        directory.insert_group(Group::new(LATIN, "Latin charters"))?;
        directory.insert_group(Group::new(GREEK, "Greek papyri"))?;

        let staff = [
            User::new(UserId::new(1), "Ada", "ada@example.org", Role::Transcriber, LATIN),
            User::new(UserId::new(2), "Bram", "bram@example.org", Role::Transcriber, LATIN),
            User::new(UserId::new(3), "Cleo", "cleo@example.org", Role::Reviewer, LATIN),
            User::new(UserId::new(4), "Dara", "dara@example.org", Role::FinalReviewer, LATIN),
            User::new(UserId::new(5), "Eos", "eos@example.org", Role::Transcriber, GREEK),
        ];
        for user in &staff {
            directory.insert_user(user.clone())?;
        }
        let [
            transcriber,
            second_transcriber,
            reviewer,
            final_reviewer,
            greek_transcriber,
        ] = staff;

        let workflow = WorkflowService::new(
            Arc::clone(&repository),
            directory,
            Arc::new(InMemoryTaskViewCache::new()),
            Arc::new(DefaultClock),
            &WorkflowConfig::default(),
        );
        Ok(Self {
            repository,
            workflow,
            transcriber,
            second_transcriber,
            reviewer,
            final_reviewer,
            greek_transcriber,
        })
    }

    /// Imports tasks with the given identifiers into a batch.
    ///
    /// # Errors
    ///
    /// Returns an error if a task identifier is already taken.
    pub async fn import(
        &self,
        group_id: GroupId,
        batch: &str,
        ids: impl IntoIterator<Item = i64>,
    ) -> eyre::Result<()> {
        for id in ids {
            let task = Task::new(
                TaskId::new(id),
                group_id,
                BatchId::new(batch),
                format!("diplomatic line {id}"),
                Some(format!("normalised line {id}")),
                &DefaultClock,
            );
            self.repository.store(&task).await?;
        }
        Ok(())
    }

    /// Sends a decision on behalf of `user`.
    pub async fn decide(
        &self,
        user: &User,
        task_id: i64,
        action: &str,
        edited: EditedFields,
    ) -> WorkflowResult<UpdateOutcome> {
        self.workflow
            .update_task(UpdateTaskRequest::new(
                action,
                TaskId::new(task_id),
                user.role(),
                edited,
                Utc::now(),
            ))
            .await
    }

    /// Loads a stored task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task is missing.
    pub async fn stored(&self, task_id: i64) -> eyre::Result<Task> {
        self.repository
            .find_by_id(TaskId::new(task_id))
            .await?
            .ok_or_else(|| eyre::eyre!("task {task_id} is missing"))
    }
}

/// Routes workflow logs to the test writer, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed by an earlier test.
    drop(
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init(),
    );
}

/// Provides a fresh harness for each test.
#[fixture]
pub fn harness() -> Harness {
    init_tracing();
    Harness::new().expect("seed harness")
}

/// Returns the identifiers of `tasks` in order.
#[must_use]
pub fn ids(tasks: &[Task]) -> Vec<i64> {
    tasks.iter().map(|task| task.id().value()).collect()
}
