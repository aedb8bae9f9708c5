//! Given steps for review cycle BDD scenarios.

use super::world::{ReviewCycleWorld, run_async, task_ref};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest_bdd_macros::given;
use scriptorium::task::{
    domain::{BatchId, EditedFields, Group, GroupId, Role, Task, User, UserId},
    ports::TaskRepository,
};

const GROUP: GroupId = GroupId::new(1);

#[given("a group with a transcriber, a reviewer and a final reviewer")]
fn group_with_all_roles(world: &mut ReviewCycleWorld) -> Result<(), eyre::Report> {
    world
        .directory
        .insert_group(Group::new(GROUP, "Latin charters"))
        .wrap_err("insert scenario group")?;
    let members = [
        (1, "Ada", Role::Transcriber),
        (2, "Brendan", Role::Reviewer),
        (3, "Cleo", Role::FinalReviewer),
    ];
    for (id, name, role) in members {
        let user = User::new(
            UserId::new(id),
            name,
            format!("{}@example.org", name.to_ascii_lowercase()),
            role,
            GROUP,
        );
        world
            .directory
            .insert_user(user.clone())
            .wrap_err("insert scenario user")?;
        world.users.insert(role, user);
    }
    Ok(())
}

#[given(r#"the group has {count:u64} tasks in batch "{batch}""#)]
fn group_has_tasks(
    world: &mut ReviewCycleWorld,
    count: u64,
    batch: String,
) -> Result<(), eyre::Report> {
    for number in 1..=count {
        let id = task_ref(number)?;
        let task = Task::new(
            id,
            GROUP,
            BatchId::new(batch.as_str()),
            format!("diplomatic line {number}"),
            Some(format!("normalised line {number}")),
            &DefaultClock,
        );
        run_async(world.repository.store(&task)).wrap_err("store scenario task")?;
    }
    Ok(())
}

#[given(r#"the "{role}" user claims their working set"#)]
fn user_claims_working_set(world: &mut ReviewCycleWorld, role: String) -> Result<(), eyre::Report> {
    let email = world.user(&role)?.email().to_owned();
    let workspace = run_async(world.service.get_user_task(&email))
        .wrap_err("load workspace in scenario setup")?;
    if workspace.tasks.is_empty() {
        return Err(eyre::eyre!("{role} claimed no tasks"));
    }
    Ok(())
}

#[given(r#"the "{role}" user has submitted task {task_id:u64} marked correct"#)]
fn user_has_submitted_correct(
    world: &mut ReviewCycleWorld,
    role: String,
    task_id: u64,
) -> Result<(), eyre::Report> {
    world
        .decide(&role, task_id, "submit", EditedFields::approve())?
        .wrap_err("submit task in scenario setup")?;
    Ok(())
}

#[given(r#"the "{role}" user has submitted task {task_id:u64} with correction "{text}""#)]
fn user_has_submitted_correction(
    world: &mut ReviewCycleWorld,
    role: String,
    task_id: u64,
    text: String,
) -> Result<(), eyre::Report> {
    world
        .decide(&role, task_id, "submit", EditedFields::correct(text))?
        .wrap_err("submit corrected task in scenario setup")?;
    Ok(())
}
