//! When steps for review cycle BDD scenarios.

use super::world::ReviewCycleWorld;
use rstest_bdd_macros::when;
use scriptorium::task::domain::EditedFields;

#[when(r#"the "{role}" user submits task {task_id:u64} marked correct"#)]
fn user_submits_correct(
    world: &mut ReviewCycleWorld,
    role: String,
    task_id: u64,
) -> Result<(), eyre::Report> {
    world.last_update = Some(world.decide(&role, task_id, "submit", EditedFields::approve())?);
    Ok(())
}

#[when(r#"the "{role}" user rejects task {task_id:u64}"#)]
fn user_rejects(
    world: &mut ReviewCycleWorld,
    role: String,
    task_id: u64,
) -> Result<(), eyre::Report> {
    world.last_update = Some(world.decide(&role, task_id, "reject", EditedFields::new())?);
    Ok(())
}

#[when(r#"the "{role}" user submits task {task_id:u64} with a blank correction"#)]
fn user_submits_blank_correction(
    world: &mut ReviewCycleWorld,
    role: String,
    task_id: u64,
) -> Result<(), eyre::Report> {
    world.last_update = Some(world.decide(&role, task_id, "submit", EditedFields::correct("   "))?);
    Ok(())
}

#[when(r#"the "{role}" user submits task {task_id:u64} without a decision"#)]
fn user_submits_without_decision(
    world: &mut ReviewCycleWorld,
    role: String,
    task_id: u64,
) -> Result<(), eyre::Report> {
    world.last_update = Some(world.decide(&role, task_id, "submit", EditedFields::new())?);
    Ok(())
}
