//! Working-set and batch claiming tests through the workflow facade.

use super::helpers::{GREEK, Harness, LATIN, harness, ids};
use eyre::ensure;
use rstest::rstest;
use scriptorium::task::{
    domain::{EditedFields, Role},
    services::{MissingEntity, WorkflowError},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_email_is_reported_as_missing_user(harness: Harness) -> eyre::Result<()> {
    let result = harness.workflow.get_user_task("nobody@example.org").await;

    let Err(err) = result else {
        eyre::bail!("expected NotFound, got {result:?}");
    };
    ensure!(
        matches!(&err, WorkflowError::NotFound(MissingEntity::User(email)) if email == "nobody@example.org"),
        "unexpected error: {err:?}"
    );
    ensure!(err.user_message() == "No user found with the provided email");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn email_lookup_ignores_case(harness: Harness) -> eyre::Result<()> {
    harness.import(LATIN, "Batch-1", 1..=2).await?;

    let workspace = harness.workflow.get_user_task("  ADA@Example.org ").await?;

    ensure!(workspace.user == harness.transcriber);
    ensure!(ids(&workspace.tasks) == vec![1, 2]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn first_visit_claims_the_earliest_batch(harness: Harness) -> eyre::Result<()> {
    harness.import(LATIN, "Batch-10", 1..=3).await?;
    harness.import(LATIN, "Batch-2", 4..=5).await?;

    let workspace = harness.workflow.get_user_task("ada@example.org").await?;

    ensure!(ids(&workspace.tasks) == vec![4, 5], "claimed {:?}", ids(&workspace.tasks));
    ensure!(workspace.history.is_empty());
    ensure!(workspace.progress.total == 2);
    ensure!(workspace.progress.completed == 0);
    for task in &workspace.tasks {
        ensure!(task.transcriber_id() == Some(harness.transcriber.id()));
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn held_working_set_is_returned_without_claiming(harness: Harness) -> eyre::Result<()> {
    harness.import(LATIN, "Batch-1", 1..=3).await?;
    harness.import(LATIN, "Batch-2", 4..=6).await?;
    let user = &harness.transcriber;

    let first = harness
        .workflow
        .get_tasks_or_assign_more(LATIN, user.id(), "TRANSCRIBER")
        .await?;
    let second = harness
        .workflow
        .get_tasks_or_assign_more(LATIN, user.id(), "TRANSCRIBER")
        .await?;

    ensure!(ids(&first) == vec![1, 2, 3]);
    ensure!(ids(&second) == ids(&first));
    ensure!(harness.stored(4).await?.transcriber_id().is_none());
    Ok(())
}

#[rstest]
#[case("EDITOR")]
#[case("")]
#[case("final reviewer")]
#[case("transcriber")]
#[case(" REVIEWER ")]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_role_names_are_rejected(
    harness: Harness,
    #[case] role: &str,
) -> eyre::Result<()> {
    let result = harness
        .workflow
        .get_tasks_or_assign_more(LATIN, harness.transcriber.id(), role)
        .await;

    let Err(err) = result else {
        eyre::bail!("expected InvalidRole, got {result:?}");
    };
    ensure!(matches!(&err, WorkflowError::InvalidRole(name) if name == role));
    ensure!(err.user_message() == format!("Invalid role provided: {role}"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn claims_are_capped_at_the_page_size(harness: Harness) -> eyre::Result<()> {
    harness.import(LATIN, "Batch-1", 1..=12).await?;
    let user = harness.transcriber.clone();

    let first = harness
        .workflow
        .get_tasks_or_assign_more(LATIN, user.id(), "TRANSCRIBER")
        .await?;
    ensure!(ids(&first) == (1..=10).collect::<Vec<i64>>());

    for task in &first {
        harness
            .decide(&user, task.id().value(), "submit", EditedFields::approve())
            .await?;
    }
    let second = harness
        .workflow
        .get_tasks_or_assign_more(LATIN, user.id(), "TRANSCRIBER")
        .await?;

    ensure!(ids(&second) == vec![11, 12]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn colleagues_never_share_a_claim(harness: Harness) -> eyre::Result<()> {
    harness.import(LATIN, "Batch-1", 1..=3).await?;
    harness.import(LATIN, "Batch-2", 4..=5).await?;

    let (ada, bram) = tokio::join!(
        harness.workflow.get_user_task("ada@example.org"),
        harness.workflow.get_user_task("bram@example.org"),
    );
    let mut claimed = ids(&ada?.tasks);
    claimed.extend(ids(&bram?.tasks));
    claimed.sort_unstable();

    ensure!(claimed == vec![1, 2, 3, 4, 5], "claimed {claimed:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn groups_do_not_see_each_others_tasks(harness: Harness) -> eyre::Result<()> {
    harness.import(LATIN, "Batch-1", 1..=2).await?;
    harness.import(GREEK, "Batch-1", 3..=4).await?;

    let greek = harness.workflow.get_user_task("eos@example.org").await?;

    ensure!(greek.user == harness.greek_transcriber);
    ensure!(ids(&greek.tasks) == vec![3, 4]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn drained_queue_yields_an_empty_working_set(harness: Harness) -> eyre::Result<()> {
    harness.import(LATIN, "Batch-1", 1..=2).await?;

    let reviewer = harness.workflow.get_user_task("cleo@example.org").await?;

    ensure!(reviewer.user.role() == Role::Reviewer);
    ensure!(reviewer.tasks.is_empty());
    ensure!(reviewer.progress.total == 0);
    Ok(())
}
