//! `PostgreSQL` repository implementation for annotation task storage.

use super::{
    models::{
        BatchRow, FinalReviewChangeset, NewTaskRow, ReviewChangeset, TaskRow,
        TranscriptionChangeset,
    },
    schema::annotation_tasks,
};
use crate::task::{
    domain::{
        BatchId, DecisionWindow, GroupId, PersistedTaskData, Role, StageUpdate, Task, TaskId,
        TaskState, UserId,
    },
    ports::{StageQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::{Array, BigInt, Text};

/// `PostgreSQL` connection pool type used by the annotation adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

const TASK_COLUMNS: &str = concat!(
    "id, group_id, batch_id, diplomatic_context, normalised_context, corrected_context, ",
    "reviewed_context, final_reviewed_context, is_correct, corrected_is_correct, ",
    "reviewed_is_correct, transcriber_id, reviewer_id, final_reviewer_id, state, created_at, ",
    "submitted_at, reviewed_at, final_reviewed_at, duration, reviewer_rejected_count, ",
    "final_reviewer_rejected_count",
);

/// Columns that vary with the acting role.
#[derive(Debug, Clone, Copy)]
struct StageColumns {
    assignee: &'static str,
    decided_at: &'static str,
}

const fn stage_columns(role: Role) -> StageColumns {
    match role {
        Role::Transcriber => StageColumns {
            assignee: "transcriber_id",
            decided_at: "submitted_at",
        },
        Role::Reviewer => StageColumns {
            assignee: "reviewer_id",
            decided_at: "reviewed_at",
        },
        Role::FinalReviewer => StageColumns {
            assignee: "final_reviewer_id",
            decided_at: "final_reviewed_at",
        },
    }
}

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(annotation_tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = annotation_tasks::table
                .find(id.value())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_assigned(
        &self,
        query: StageQuery,
        limit: usize,
    ) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let columns = stage_columns(query.role);
            let rows = diesel::sql_query(format!(
                "SELECT {TASK_COLUMNS} FROM annotation_tasks \
                 WHERE group_id = $1 AND state = $2 AND {} = $3",
                columns.assignee,
            ))
            .bind::<BigInt, _>(query.group_id.value())
            .bind::<Text, _>(query.role.owner_state().as_str())
            .bind::<BigInt, _>(query.user_id.value())
            .load::<TaskRow>(connection)
            .map_err(TaskRepositoryError::persistence)?;

            let mut tasks = rows_to_tasks(rows)?;
            sort_by_batch(&mut tasks);
            tasks.truncate(limit);
            Ok(tasks)
        })
        .await
    }

    async fn claim_next_batch(
        &self,
        query: StageQuery,
        limit: usize,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let row_limit = i64::try_from(limit).map_err(TaskRepositoryError::persistence)?;
        self.run_blocking(move |connection| {
            connection
                .transaction::<_, DieselError, _>(|tx| claim_in_transaction(tx, query, row_limit))
                .map_err(TaskRepositoryError::persistence)
                .and_then(rows_to_tasks)
        })
        .await
    }

    async fn apply_update(&self, id: TaskId, update: &StageUpdate) -> TaskRepositoryResult<Task> {
        let update = update.clone();
        self.run_blocking(move |connection| {
            let row = write_stage_update(connection, id, &update)
                .optional()
                .map_err(TaskRepositoryError::persistence)?
                .ok_or(TaskRepositoryError::NotFound(id))?;
            row_to_task(row)
        })
        .await
    }

    async fn find_history(
        &self,
        query: StageQuery,
        limit: usize,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let row_limit = i64::try_from(limit).map_err(TaskRepositoryError::persistence)?;
        let states: Vec<String> = query
            .role
            .history_states()
            .iter()
            .map(|state| state.as_str().to_owned())
            .collect();
        self.run_blocking(move |connection| {
            let columns = stage_columns(query.role);
            let rows = diesel::sql_query(format!(
                "SELECT {TASK_COLUMNS} FROM annotation_tasks \
                 WHERE group_id = $1 AND {} = $2 AND state = ANY($3) \
                 ORDER BY {} DESC NULLS LAST, id DESC LIMIT $4",
                columns.assignee, columns.decided_at,
            ))
            .bind::<BigInt, _>(query.group_id.value())
            .bind::<BigInt, _>(query.user_id.value())
            .bind::<Array<Text>, _>(states)
            .bind::<BigInt, _>(row_limit)
            .load::<TaskRow>(connection)
            .map_err(TaskRepositoryError::persistence)?;
            rows_to_tasks(rows)
        })
        .await
    }

    async fn list_assigned_to(&self, query: StageQuery) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let columns = stage_columns(query.role);
            let rows = diesel::sql_query(format!(
                "SELECT {TASK_COLUMNS} FROM annotation_tasks \
                 WHERE group_id = $1 AND {} = $2 ORDER BY id",
                columns.assignee,
            ))
            .bind::<BigInt, _>(query.group_id.value())
            .bind::<BigInt, _>(query.user_id.value())
            .load::<TaskRow>(connection)
            .map_err(TaskRepositoryError::persistence)?;
            rows_to_tasks(rows)
        })
        .await
    }

    async fn find_decided_within(
        &self,
        group_id: GroupId,
        window: DecisionWindow,
    ) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let (start, end) = (window.start(), window.end());
            let rows = annotation_tasks::table
                .filter(annotation_tasks::group_id.eq(group_id.value()))
                .filter(
                    annotation_tasks::submitted_at
                        .between(start, end)
                        .or(annotation_tasks::reviewed_at.between(start, end))
                        .or(annotation_tasks::final_reviewed_at.between(start, end)),
                )
                .order((annotation_tasks::created_at.desc(), annotation_tasks::id.desc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows_to_tasks(rows)
        })
        .await
    }
}

/// Claims from the earliest batch that still has unlocked, unassigned rows.
///
/// Rows locked by a concurrent claimer are skipped rather than waited on, so
/// a drained batch falls through to the next one in order.
fn claim_in_transaction(
    connection: &mut PgConnection,
    query: StageQuery,
    limit: i64,
) -> Result<Vec<TaskRow>, DieselError> {
    let columns = stage_columns(query.role);
    let owner_state = query.role.owner_state().as_str();

    let mut batches: Vec<BatchId> = diesel::sql_query(format!(
        "SELECT DISTINCT batch_id FROM annotation_tasks \
         WHERE group_id = $1 AND state = $2 AND {} IS NULL",
        columns.assignee,
    ))
    .bind::<BigInt, _>(query.group_id.value())
    .bind::<Text, _>(owner_state)
    .load::<BatchRow>(connection)?
    .into_iter()
    .map(|row| BatchId::new(row.batch_id))
    .collect();
    batches.sort();

    let claim_sql = format!(
        "UPDATE annotation_tasks SET {assignee} = $1 \
         WHERE id IN (\
             SELECT id FROM annotation_tasks \
             WHERE group_id = $2 AND state = $3 AND batch_id = $4 AND {assignee} IS NULL \
             ORDER BY id LIMIT $5 FOR UPDATE SKIP LOCKED\
         ) AND {assignee} IS NULL \
         RETURNING {TASK_COLUMNS}",
        assignee = columns.assignee,
    );
    for batch in batches {
        let mut claimed = diesel::sql_query(claim_sql.as_str())
            .bind::<BigInt, _>(query.user_id.value())
            .bind::<BigInt, _>(query.group_id.value())
            .bind::<Text, _>(owner_state)
            .bind::<Text, _>(batch.as_str())
            .bind::<BigInt, _>(limit)
            .load::<TaskRow>(connection)?;
        if !claimed.is_empty() {
            claimed.sort_by_key(|row| row.id);
            return Ok(claimed);
        }
    }
    Ok(Vec::new())
}

fn write_stage_update(
    connection: &mut PgConnection,
    id: TaskId,
    update: &StageUpdate,
) -> QueryResult<TaskRow> {
    let target = diesel::update(annotation_tasks::table.find(id.value()));
    match update {
        StageUpdate::Transcription(change) => target
            .set(&TranscriptionChangeset {
                state: change.state.as_str().to_owned(),
                is_correct: change.is_correct,
                corrected_context: change.corrected_context.as_column(),
                submitted_at: change.submitted_at,
                duration: Some(change.duration.clone()),
            })
            .returning(TaskRow::as_returning())
            .get_result(connection),
        StageUpdate::Review(change) => {
            let changeset = ReviewChangeset {
                state: change.state.as_str().to_owned(),
                corrected_is_correct: change.decision,
                reviewed_context: change.content.as_column(),
                reviewed_at: change.decided_at,
            };
            if change.count_rejection {
                target
                    .set((
                        &changeset,
                        annotation_tasks::reviewer_rejected_count
                            .eq(annotation_tasks::reviewer_rejected_count + 1),
                    ))
                    .returning(TaskRow::as_returning())
                    .get_result(connection)
            } else {
                target
                    .set(&changeset)
                    .returning(TaskRow::as_returning())
                    .get_result(connection)
            }
        }
        StageUpdate::FinalReview(change) => {
            let changeset = FinalReviewChangeset {
                state: change.state.as_str().to_owned(),
                reviewed_is_correct: change.decision,
                final_reviewed_context: change.content.as_column(),
                final_reviewed_at: change.decided_at,
            };
            if change.count_rejection {
                target
                    .set((
                        &changeset,
                        annotation_tasks::final_reviewer_rejected_count
                            .eq(annotation_tasks::final_reviewer_rejected_count + 1),
                    ))
                    .returning(TaskRow::as_returning())
                    .get_result(connection)
            } else {
                target
                    .set(&changeset)
                    .returning(TaskRow::as_returning())
                    .get_result(connection)
            }
        }
    }
}

fn sort_by_batch(tasks: &mut [Task]) {
    tasks.sort_by(|left, right| {
        left.batch_id()
            .cmp(right.batch_id())
            .then_with(|| left.id().cmp(&right.id()))
    });
}

fn to_new_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    Ok(NewTaskRow {
        id: task.id().value(),
        group_id: task.group_id().value(),
        batch_id: task.batch_id().as_str().to_owned(),
        diplomatic_context: task.diplomatic_context().to_owned(),
        normalised_context: task.normalised_context().map(str::to_owned),
        corrected_context: task.corrected_context().map(str::to_owned),
        reviewed_context: task.reviewed_context().map(str::to_owned),
        final_reviewed_context: task.final_reviewed_context().map(str::to_owned),
        is_correct: task.is_correct(),
        corrected_is_correct: task.corrected_is_correct(),
        reviewed_is_correct: task.reviewed_is_correct(),
        transcriber_id: task.transcriber_id().map(UserId::value),
        reviewer_id: task.reviewer_id().map(UserId::value),
        final_reviewer_id: task.final_reviewer_id().map(UserId::value),
        state: task.state().as_str().to_owned(),
        created_at: task.created_at(),
        submitted_at: task.submitted_at(),
        reviewed_at: task.reviewed_at(),
        final_reviewed_at: task.final_reviewed_at(),
        duration: task.duration().map(str::to_owned),
        reviewer_rejected_count: i32::try_from(task.reviewer_rejected_count())
            .map_err(TaskRepositoryError::persistence)?,
        final_reviewer_rejected_count: i32::try_from(task.final_reviewer_rejected_count())
            .map_err(TaskRepositoryError::persistence)?,
    })
}

fn rows_to_tasks(rows: Vec<TaskRow>) -> TaskRepositoryResult<Vec<Task>> {
    rows.into_iter().map(row_to_task).collect()
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let state = TaskState::try_from(row.state.as_str()).map_err(TaskRepositoryError::persistence)?;
    let reviewer_rejected_count =
        u32::try_from(row.reviewer_rejected_count).map_err(TaskRepositoryError::persistence)?;
    let final_reviewer_rejected_count = u32::try_from(row.final_reviewer_rejected_count)
        .map_err(TaskRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::new(row.id),
        group_id: GroupId::new(row.group_id),
        batch_id: BatchId::new(row.batch_id),
        diplomatic_context: row.diplomatic_context,
        normalised_context: row.normalised_context,
        corrected_context: row.corrected_context,
        reviewed_context: row.reviewed_context,
        final_reviewed_context: row.final_reviewed_context,
        is_correct: row.is_correct,
        corrected_is_correct: row.corrected_is_correct,
        reviewed_is_correct: row.reviewed_is_correct,
        transcriber_id: row.transcriber_id.map(UserId::new),
        reviewer_id: row.reviewer_id.map(UserId::new),
        final_reviewer_id: row.final_reviewer_id.map(UserId::new),
        state,
        created_at: row.created_at,
        submitted_at: row.submitted_at,
        reviewed_at: row.reviewed_at,
        final_reviewed_at: row.final_reviewed_at,
        duration: row.duration,
        reviewer_rejected_count,
        final_reviewer_rejected_count,
    }))
}
