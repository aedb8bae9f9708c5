//! Reviewer export tests through the workflow facade.

use super::helpers::{Harness, LATIN, harness};
use chrono::{TimeDelta, Utc};
use mockable::DefaultClock;
use eyre::{OptionExt, ensure};
use rstest::rstest;
use scriptorium::task::{
    domain::{BatchId, EditedFields, Role, Task, TaskDomainError, TaskId},
    ports::TaskRepository,
    services::{EXPORT_HEADERS, WorkflowError},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn export_lists_only_decided_tasks(harness: Harness) -> eyre::Result<()> {
    harness.import(LATIN, "Batch-1", 1..=3).await?;
    harness.workflow.get_user_task("ada@example.org").await?;
    harness
        .decide(
            &harness.transcriber,
            1,
            "submit",
            EditedFields::correct("line, with \"quotes\""),
        )
        .await?;

    let now = Utc::now();
    let document = harness
        .workflow
        .export_tasks(
            &harness.reviewer,
            LATIN,
            now - TimeDelta::hours(1),
            now + TimeDelta::hours(1),
        )
        .await?;

    let mut lines = document.split('\n');
    let header = lines.next().ok_or_eyre("missing header")?;
    ensure!(header == EXPORT_HEADERS.join(","));
    let row = lines.next().ok_or_eyre("missing row")?;
    ensure!(
        row.starts_with(concat!(
            "1,Latin charters,submitted,Batch-1,Ada,,,",
            "\"diplomatic line 1\",\"normalised line 1\",\"line, with \"\"quotes\"\"\",\"\",\"\","
        )),
        "unexpected row: {row}"
    );
    ensure!(row.ends_with(",0,0"), "unexpected counters: {row}");
    ensure!(lines.next().is_none(), "undecided tasks were exported");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn window_in_the_past_exports_the_header_only(harness: Harness) -> eyre::Result<()> {
    harness.import(LATIN, "Batch-1", [1]).await?;
    harness.workflow.get_user_task("ada@example.org").await?;
    harness
        .decide(&harness.transcriber, 1, "submit", EditedFields::approve())
        .await?;

    let now = Utc::now();
    let document = harness
        .workflow
        .export_tasks(
            &harness.final_reviewer,
            LATIN,
            now - TimeDelta::days(2),
            now - TimeDelta::days(1),
        )
        .await?;

    ensure!(document == EXPORT_HEADERS.join(","));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transcribers_cannot_export(harness: Harness) -> eyre::Result<()> {
    let now = Utc::now();
    let result = harness
        .workflow
        .export_tasks(&harness.transcriber, LATIN, now - TimeDelta::days(1), now)
        .await;

    let Err(err) = result else {
        eyre::bail!("expected AccessDenied, got {result:?}");
    };
    ensure!(matches!(
        err,
        WorkflowError::AccessDenied {
            role: Role::Transcriber
        }
    ));
    ensure!(err.user_message() == "Export is restricted to reviewers");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn inverted_window_is_refused(harness: Harness) -> eyre::Result<()> {
    let now = Utc::now();
    let result = harness
        .workflow
        .export_tasks(&harness.reviewer, LATIN, now, now - TimeDelta::days(1))
        .await;

    ensure!(
        matches!(
            result,
            Err(WorkflowError::ValidationFailure(
                TaskDomainError::InvalidDateRange
            ))
        ),
        "unexpected result: {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn quotes_in_the_source_text_are_doubled(harness: Harness) -> eyre::Result<()> {
    let task = Task::new(
        TaskId::new(7),
        LATIN,
        BatchId::new("Batch-1"),
        "the \"old\" charter",
        None,
        &DefaultClock,
    );
    harness.repository.store(&task).await?;
    harness.workflow.get_user_task("ada@example.org").await?;
    harness
        .decide(&harness.transcriber, 7, "trash", EditedFields::new())
        .await?;

    let now = Utc::now();
    let document = harness
        .workflow
        .export_tasks(
            &harness.reviewer,
            LATIN,
            now - TimeDelta::hours(1),
            now + TimeDelta::hours(1),
        )
        .await?;

    let row = document.lines().nth(1).ok_or_eyre("missing row")?;
    ensure!(
        row.starts_with("7,Latin charters,trashed,Batch-1,Ada,,,\"the \"\"old\"\" charter\",\"\","),
        "unexpected row: {row}"
    );
    Ok(())
}
