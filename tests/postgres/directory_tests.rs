//! Lookup tests for the `PostgreSQL` user directory.

use super::helpers::{GROUP, prepare};
use eyre::{OptionExt, ensure};
use scriptorium::task::{
    domain::{GroupId, Role, User, UserId},
    ports::{UserDirectory, UserDirectoryError},
};

#[tokio::test(flavor = "multi_thread")]
async fn users_are_found_by_email_regardless_of_case() -> eyre::Result<()> {
    let Some(stores) = prepare().await? else {
        return Ok(());
    };

    let user = stores
        .directory
        .find_by_email("CLEO@example.ORG")
        .await?
        .ok_or_eyre("user missing")?;

    ensure!(user.id() == UserId::new(2));
    ensure!(user.role() == Role::Reviewer);
    ensure!(user.group_id() == GROUP);
    ensure!(
        stores
            .directory
            .find_by_email("nobody@example.org")
            .await?
            .is_none()
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn users_and_groups_are_found_by_id() -> eyre::Result<()> {
    let Some(stores) = prepare().await? else {
        return Ok(());
    };

    let user = stores
        .directory
        .find_by_id(UserId::new(3))
        .await?
        .ok_or_eyre("user missing")?;
    let group = stores
        .directory
        .find_group(GROUP)
        .await?
        .ok_or_eyre("group missing")?;

    ensure!(user.name() == "Dara");
    ensure!(user.role() == Role::FinalReviewer);
    ensure!(group.name() == "Latin charters");
    ensure!(
        stores
            .directory
            .find_group(GroupId::new(99))
            .await?
            .is_none()
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_email_is_rejected() -> eyre::Result<()> {
    let Some(stores) = prepare().await? else {
        return Ok(());
    };

    let result = stores
        .directory
        .insert_user(User::new(
            UserId::new(9),
            "Ada Again",
            "Ada@Example.org",
            Role::Reviewer,
            GROUP,
        ))
        .await;

    ensure!(
        matches!(result, Err(UserDirectoryError::DuplicateEmail(_))),
        "unexpected result: {result:?}"
    );
    Ok(())
}
