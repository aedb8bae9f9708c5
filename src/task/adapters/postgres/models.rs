//! Diesel row models for annotation persistence.

use super::schema::{annotation_groups, annotation_tasks, annotators};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{Bool, Int4, Int8, Nullable, Text, Timestamptz, Varchar};

/// Query result row for task records.
///
/// Field names match the table so rows load from both typed and raw queries.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = annotation_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    #[diesel(sql_type = Int8)]
    pub id: i64,
    /// Owning group.
    #[diesel(sql_type = Int8)]
    pub group_id: i64,
    /// Claim batch.
    #[diesel(sql_type = Varchar)]
    pub batch_id: String,
    /// Original source text.
    #[diesel(sql_type = Text)]
    pub diplomatic_context: String,
    /// Machine suggestion.
    #[diesel(sql_type = Nullable<Text>)]
    pub normalised_context: Option<String>,
    /// Transcriber output.
    #[diesel(sql_type = Nullable<Text>)]
    pub corrected_context: Option<String>,
    /// Reviewer output.
    #[diesel(sql_type = Nullable<Text>)]
    pub reviewed_context: Option<String>,
    /// Final reviewer output.
    #[diesel(sql_type = Nullable<Text>)]
    pub final_reviewed_context: Option<String>,
    /// Transcriber verdict.
    #[diesel(sql_type = Nullable<Bool>)]
    pub is_correct: Option<bool>,
    /// Reviewer verdict.
    #[diesel(sql_type = Nullable<Bool>)]
    pub corrected_is_correct: Option<bool>,
    /// Final reviewer verdict.
    #[diesel(sql_type = Nullable<Bool>)]
    pub reviewed_is_correct: Option<bool>,
    /// Claiming transcriber.
    #[diesel(sql_type = Nullable<Int8>)]
    pub transcriber_id: Option<i64>,
    /// Claiming reviewer.
    #[diesel(sql_type = Nullable<Int8>)]
    pub reviewer_id: Option<i64>,
    /// Claiming final reviewer.
    #[diesel(sql_type = Nullable<Int8>)]
    pub final_reviewer_id: Option<i64>,
    /// Lifecycle state.
    #[diesel(sql_type = Varchar)]
    pub state: String,
    /// Import timestamp.
    #[diesel(sql_type = Timestamptz)]
    pub created_at: DateTime<Utc>,
    /// Latest transcriber decision.
    #[diesel(sql_type = Nullable<Timestamptz>)]
    pub submitted_at: Option<DateTime<Utc>>,
    /// Latest reviewer decision.
    #[diesel(sql_type = Nullable<Timestamptz>)]
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Latest final reviewer decision.
    #[diesel(sql_type = Nullable<Timestamptz>)]
    pub final_reviewed_at: Option<DateTime<Utc>>,
    /// Formatted handling time.
    #[diesel(sql_type = Nullable<Varchar>)]
    pub duration: Option<String>,
    /// Reviewer rejections.
    #[diesel(sql_type = Int4)]
    pub reviewer_rejected_count: i32,
    /// Final reviewer rejections.
    #[diesel(sql_type = Int4)]
    pub final_reviewer_rejected_count: i32,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = annotation_tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: i64,
    /// Owning group.
    pub group_id: i64,
    /// Claim batch.
    pub batch_id: String,
    /// Original source text.
    pub diplomatic_context: String,
    /// Machine suggestion.
    pub normalised_context: Option<String>,
    /// Transcriber output.
    pub corrected_context: Option<String>,
    /// Reviewer output.
    pub reviewed_context: Option<String>,
    /// Final reviewer output.
    pub final_reviewed_context: Option<String>,
    /// Transcriber verdict.
    pub is_correct: Option<bool>,
    /// Reviewer verdict.
    pub corrected_is_correct: Option<bool>,
    /// Final reviewer verdict.
    pub reviewed_is_correct: Option<bool>,
    /// Claiming transcriber.
    pub transcriber_id: Option<i64>,
    /// Claiming reviewer.
    pub reviewer_id: Option<i64>,
    /// Claiming final reviewer.
    pub final_reviewer_id: Option<i64>,
    /// Lifecycle state.
    pub state: String,
    /// Import timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest transcriber decision.
    pub submitted_at: Option<DateTime<Utc>>,
    /// Latest reviewer decision.
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Latest final reviewer decision.
    pub final_reviewed_at: Option<DateTime<Utc>>,
    /// Formatted handling time.
    pub duration: Option<String>,
    /// Reviewer rejections.
    pub reviewer_rejected_count: i32,
    /// Final reviewer rejections.
    pub final_reviewer_rejected_count: i32,
}

/// Column changes for a transcriber decision.
///
/// `None` skips a column; `Some(None)` writes `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = annotation_tasks)]
pub struct TranscriptionChangeset {
    /// New lifecycle state.
    pub state: String,
    /// Verdict, left untouched when absent.
    pub is_correct: Option<bool>,
    /// Transcriber output write.
    pub corrected_context: Option<Option<String>>,
    /// Decision timestamp.
    pub submitted_at: DateTime<Utc>,
    /// Handling time write.
    pub duration: Option<Option<String>>,
}

/// Column changes for a reviewer decision.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = annotation_tasks)]
pub struct ReviewChangeset {
    /// New lifecycle state.
    pub state: String,
    /// Verdict, left untouched when absent.
    pub corrected_is_correct: Option<bool>,
    /// Reviewer output write.
    pub reviewed_context: Option<Option<String>>,
    /// Decision timestamp.
    pub reviewed_at: DateTime<Utc>,
}

/// Column changes for a final reviewer decision.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = annotation_tasks)]
pub struct FinalReviewChangeset {
    /// New lifecycle state.
    pub state: String,
    /// Verdict, left untouched when absent.
    pub reviewed_is_correct: Option<bool>,
    /// Final reviewer output write.
    pub final_reviewed_context: Option<Option<String>>,
    /// Decision timestamp.
    pub final_reviewed_at: DateTime<Utc>,
}

/// Distinct batch identifier row.
#[derive(Debug, Clone, QueryableByName)]
pub struct BatchRow {
    /// Batch identifier.
    #[diesel(sql_type = Varchar)]
    pub batch_id: String,
}

/// Row model for annotators.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable, Insertable)]
#[diesel(table_name = annotators)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// User identifier.
    #[diesel(sql_type = Int8)]
    pub id: i64,
    /// Display name.
    #[diesel(sql_type = Varchar)]
    pub name: String,
    /// Email address.
    #[diesel(sql_type = Varchar)]
    pub email: String,
    /// Role name.
    #[diesel(sql_type = Varchar)]
    pub role: String,
    /// Owning group.
    #[diesel(sql_type = Int8)]
    pub group_id: i64,
}

/// Row model for groups.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = annotation_groups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GroupRow {
    /// Group identifier.
    pub id: i64,
    /// Group name.
    pub name: String,
}
