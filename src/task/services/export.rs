//! Delimited-text export of a group's decided tasks.

use super::error::{StoreFailure, WorkflowError, WorkflowResult, bounded};
use crate::config::WorkflowConfig;
use crate::delimited::{RECORD_SEPARATOR, join_record, plain_field, quote_field};
use crate::task::{
    domain::{DecisionWindow, GroupId, Role, Task, User, UserId},
    ports::{TaskRepository, UserDirectory},
};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Column headers of an export, in order.
pub const EXPORT_HEADERS: [&str; 19] = [
    "Task ID",
    "Group",
    "State",
    "Batch ID",
    "Transcriber",
    "Reviewer",
    "Final Reviewer",
    "Diplomatic Context",
    "Normalised Context",
    "Corrected Context",
    "Reviewed Context",
    "Final Reviewed Context",
    "Created At",
    "Submitted At",
    "Reviewed At",
    "Final Reviewed At",
    "Duration",
    "Reviewer Rejected Count",
    "Final Reviewer Rejected Count",
];

/// Renders decided tasks as comma-separated text for reviewers.
#[derive(Clone)]
pub struct TaskExportService<R, D>
where
    R: TaskRepository,
    D: UserDirectory,
{
    repository: Arc<R>,
    directory: Arc<D>,
    store_timeout: Duration,
}

impl<R, D> TaskExportService<R, D>
where
    R: TaskRepository,
    D: UserDirectory,
{
    /// Creates an export service.
    #[must_use]
    pub fn new(repository: Arc<R>, directory: Arc<D>, config: &WorkflowConfig) -> Self {
        Self {
            repository,
            directory,
            store_timeout: config.store_timeout(),
        }
    }

    /// Exports every task in the group with a stage decision inside
    /// `[from, to]`, newest import first.
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::AccessDenied`] when the requester is a transcriber.
    /// - [`WorkflowError::ValidationFailure`] when `from` is after `to`.
    /// - [`WorkflowError::ReadFailure`] when the store fails or times out.
    pub async fn export(
        &self,
        requester: &User,
        group_id: GroupId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> WorkflowResult<String> {
        if requester.role() == Role::Transcriber {
            tracing::warn!(
                user_id = %requester.id(),
                group_id = %group_id,
                "export refused for transcriber"
            );
            return Err(WorkflowError::AccessDenied {
                role: requester.role(),
            });
        }
        let window = DecisionWindow::new(from, to)?;

        let tasks = bounded(
            self.store_timeout,
            self.repository.find_decided_within(group_id, window),
        )
        .await
        .map_err(|err| export_failure(group_id, err))?;
        let group_name = bounded(self.store_timeout, self.directory.find_group(group_id))
            .await
            .map_err(|err| export_failure(group_id, err))?
            .map(|group| group.name().to_owned())
            .unwrap_or_default();
        let names = self.resolve_names(group_id, &tasks).await?;

        let mut document = join_record(&EXPORT_HEADERS);
        for task in &tasks {
            document.push(RECORD_SEPARATOR);
            document.push_str(&render_row(task, &group_name, &names));
        }

        tracing::info!(
            user_id = %requester.id(),
            group_id = %group_id,
            rows = tasks.len(),
            "tasks exported"
        );
        Ok(document)
    }

    async fn resolve_names(
        &self,
        group_id: GroupId,
        tasks: &[Task],
    ) -> WorkflowResult<HashMap<UserId, String>> {
        let mut names = HashMap::new();
        let assignees = tasks.iter().flat_map(|task| {
            [
                task.transcriber_id(),
                task.reviewer_id(),
                task.final_reviewer_id(),
            ]
            .into_iter()
            .flatten()
        });
        for user_id in assignees {
            if names.contains_key(&user_id) {
                continue;
            }
            let user = bounded(self.store_timeout, self.directory.find_by_id(user_id))
                .await
                .map_err(|err| export_failure(group_id, err))?;
            names.insert(
                user_id,
                user.map(|found| found.name().to_owned()).unwrap_or_default(),
            );
        }
        Ok(names)
    }
}

fn render_row(task: &Task, group_name: &str, names: &HashMap<UserId, String>) -> String {
    let name_of = |user_id: Option<UserId>| {
        user_id
            .and_then(|id| names.get(&id))
            .map_or_else(String::new, |name| plain_field(name))
    };
    let timestamp = |instant: Option<DateTime<Utc>>| {
        instant.map_or_else(String::new, |value| {
            value.to_rfc3339_opts(SecondsFormat::Millis, true)
        })
    };
    let lineage = |text: Option<&str>| quote_field(text.unwrap_or_default());

    let fields = [
        task.id().to_string(),
        plain_field(group_name),
        task.state().to_string(),
        plain_field(task.batch_id().as_str()),
        name_of(task.transcriber_id()),
        name_of(task.reviewer_id()),
        name_of(task.final_reviewer_id()),
        quote_field(task.diplomatic_context()),
        lineage(task.normalised_context()),
        lineage(task.corrected_context()),
        lineage(task.reviewed_context()),
        lineage(task.final_reviewed_context()),
        timestamp(Some(task.created_at())),
        timestamp(task.submitted_at()),
        timestamp(task.reviewed_at()),
        timestamp(task.final_reviewed_at()),
        plain_field(task.duration().unwrap_or_default()),
        task.reviewer_rejected_count().to_string(),
        task.final_reviewer_rejected_count().to_string(),
    ];
    join_record(&fields)
}

fn export_failure(group_id: GroupId, cause: StoreFailure) -> WorkflowError {
    tracing::warn!(group_id = %group_id, error = %cause, "task export failed");
    WorkflowError::ReadFailure(cause)
}
