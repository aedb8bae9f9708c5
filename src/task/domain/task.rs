//! Task aggregate root and its per-stage lineage.

use super::{BatchId, ContentWrite, GroupId, Role, StageUpdate, TaskAction, TaskId, TaskState, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Annotatable text item moving through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    group_id: GroupId,
    batch_id: BatchId,
    diplomatic_context: String,
    normalised_context: Option<String>,
    corrected_context: Option<String>,
    reviewed_context: Option<String>,
    final_reviewed_context: Option<String>,
    is_correct: Option<bool>,
    corrected_is_correct: Option<bool>,
    reviewed_is_correct: Option<bool>,
    transcriber_id: Option<UserId>,
    reviewer_id: Option<UserId>,
    final_reviewer_id: Option<UserId>,
    state: TaskState,
    created_at: DateTime<Utc>,
    submitted_at: Option<DateTime<Utc>>,
    reviewed_at: Option<DateTime<Utc>>,
    final_reviewed_at: Option<DateTime<Utc>>,
    duration: Option<String>,
    reviewer_rejected_count: u32,
    final_reviewer_rejected_count: u32,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Owning group.
    pub group_id: GroupId,
    /// Batch the task is claimed with.
    pub batch_id: BatchId,
    /// Original source text.
    pub diplomatic_context: String,
    /// Machine-suggested normalisation.
    pub normalised_context: Option<String>,
    /// Transcriber output.
    pub corrected_context: Option<String>,
    /// Reviewer output.
    pub reviewed_context: Option<String>,
    /// Final reviewer output.
    pub final_reviewed_context: Option<String>,
    /// Transcriber verdict on the suggestion.
    pub is_correct: Option<bool>,
    /// Reviewer verdict on the transcription.
    pub corrected_is_correct: Option<bool>,
    /// Final reviewer verdict on the review.
    pub reviewed_is_correct: Option<bool>,
    /// Claiming transcriber.
    pub transcriber_id: Option<UserId>,
    /// Claiming reviewer.
    pub reviewer_id: Option<UserId>,
    /// Claiming final reviewer.
    pub final_reviewer_id: Option<UserId>,
    /// Persisted lifecycle state.
    pub state: TaskState,
    /// Import timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest transcriber decision timestamp.
    pub submitted_at: Option<DateTime<Utc>>,
    /// Latest reviewer decision timestamp.
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Latest final reviewer decision timestamp.
    pub final_reviewed_at: Option<DateTime<Utc>>,
    /// Handling time of the latest forward stage.
    pub duration: Option<String>,
    /// Times a reviewer sent the task back.
    pub reviewer_rejected_count: u32,
    /// Times a final reviewer sent the task back.
    pub final_reviewer_rejected_count: u32,
}

impl Task {
    /// Creates an unassigned task waiting for transcription.
    #[must_use]
    pub fn new(
        id: TaskId,
        group_id: GroupId,
        batch_id: BatchId,
        diplomatic_context: impl Into<String>,
        normalised_context: Option<String>,
        clock: &impl Clock,
    ) -> Self {
        Self::from_persisted(PersistedTaskData {
            id,
            group_id,
            batch_id,
            diplomatic_context: diplomatic_context.into(),
            normalised_context,
            corrected_context: None,
            reviewed_context: None,
            final_reviewed_context: None,
            is_correct: None,
            corrected_is_correct: None,
            reviewed_is_correct: None,
            transcriber_id: None,
            reviewer_id: None,
            final_reviewer_id: None,
            state: TaskState::Transcribing,
            created_at: clock.utc(),
            submitted_at: None,
            reviewed_at: None,
            final_reviewed_at: None,
            duration: None,
            reviewer_rejected_count: 0,
            final_reviewer_rejected_count: 0,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            group_id: data.group_id,
            batch_id: data.batch_id,
            diplomatic_context: data.diplomatic_context,
            normalised_context: data.normalised_context,
            corrected_context: data.corrected_context,
            reviewed_context: data.reviewed_context,
            final_reviewed_context: data.final_reviewed_context,
            is_correct: data.is_correct,
            corrected_is_correct: data.corrected_is_correct,
            reviewed_is_correct: data.reviewed_is_correct,
            transcriber_id: data.transcriber_id,
            reviewer_id: data.reviewer_id,
            final_reviewer_id: data.final_reviewer_id,
            state: data.state,
            created_at: data.created_at,
            submitted_at: data.submitted_at,
            reviewed_at: data.reviewed_at,
            final_reviewed_at: data.final_reviewed_at,
            duration: data.duration,
            reviewer_rejected_count: data.reviewer_rejected_count,
            final_reviewer_rejected_count: data.final_reviewer_rejected_count,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning group.
    #[must_use]
    pub const fn group_id(&self) -> GroupId {
        self.group_id
    }

    /// Returns the batch identifier.
    #[must_use]
    pub const fn batch_id(&self) -> &BatchId {
        &self.batch_id
    }

    /// Returns the immutable source text.
    #[must_use]
    pub fn diplomatic_context(&self) -> &str {
        &self.diplomatic_context
    }

    /// Returns the machine-suggested normalisation.
    #[must_use]
    pub fn normalised_context(&self) -> Option<&str> {
        self.normalised_context.as_deref()
    }

    /// Returns the transcriber output.
    #[must_use]
    pub fn corrected_context(&self) -> Option<&str> {
        self.corrected_context.as_deref()
    }

    /// Returns the reviewer output.
    #[must_use]
    pub fn reviewed_context(&self) -> Option<&str> {
        self.reviewed_context.as_deref()
    }

    /// Returns the final reviewer output.
    #[must_use]
    pub fn final_reviewed_context(&self) -> Option<&str> {
        self.final_reviewed_context.as_deref()
    }

    /// Returns the transcriber verdict.
    #[must_use]
    pub const fn is_correct(&self) -> Option<bool> {
        self.is_correct
    }

    /// Returns the reviewer verdict.
    #[must_use]
    pub const fn corrected_is_correct(&self) -> Option<bool> {
        self.corrected_is_correct
    }

    /// Returns the final reviewer verdict.
    #[must_use]
    pub const fn reviewed_is_correct(&self) -> Option<bool> {
        self.reviewed_is_correct
    }

    /// Returns the claiming transcriber.
    #[must_use]
    pub const fn transcriber_id(&self) -> Option<UserId> {
        self.transcriber_id
    }

    /// Returns the claiming reviewer.
    #[must_use]
    pub const fn reviewer_id(&self) -> Option<UserId> {
        self.reviewer_id
    }

    /// Returns the claiming final reviewer.
    #[must_use]
    pub const fn final_reviewer_id(&self) -> Option<UserId> {
        self.final_reviewer_id
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        self.state
    }

    /// Returns the import timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest transcriber decision timestamp.
    #[must_use]
    pub const fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    /// Returns the latest reviewer decision timestamp.
    #[must_use]
    pub const fn reviewed_at(&self) -> Option<DateTime<Utc>> {
        self.reviewed_at
    }

    /// Returns the latest final reviewer decision timestamp.
    #[must_use]
    pub const fn final_reviewed_at(&self) -> Option<DateTime<Utc>> {
        self.final_reviewed_at
    }

    /// Returns the formatted handling time of the latest forward stage.
    #[must_use]
    pub fn duration(&self) -> Option<&str> {
        self.duration.as_deref()
    }

    /// Returns how often a reviewer sent the task back.
    #[must_use]
    pub const fn reviewer_rejected_count(&self) -> u32 {
        self.reviewer_rejected_count
    }

    /// Returns how often a final reviewer sent the task back.
    #[must_use]
    pub const fn final_reviewer_rejected_count(&self) -> u32 {
        self.final_reviewer_rejected_count
    }

    /// Returns the user holding this task for the role's stage.
    #[must_use]
    pub const fn assignee(&self, role: Role) -> Option<UserId> {
        match role {
            Role::Transcriber => self.transcriber_id,
            Role::Reviewer => self.reviewer_id,
            Role::FinalReviewer => self.final_reviewer_id,
        }
    }

    /// Returns the text the role is asked to judge.
    #[must_use]
    pub fn stage_input(&self, role: Role) -> Option<&str> {
        match role {
            Role::Transcriber => self.normalised_context(),
            Role::Reviewer => self.corrected_context(),
            Role::FinalReviewer => self.reviewed_context(),
        }
    }

    /// Returns the text the role produced.
    #[must_use]
    pub fn stage_output(&self, role: Role) -> Option<&str> {
        match role {
            Role::Transcriber => self.corrected_context(),
            Role::Reviewer => self.reviewed_context(),
            Role::FinalReviewer => self.final_reviewed_context(),
        }
    }

    /// Returns the role's yes/no verdict.
    #[must_use]
    pub const fn decision(&self, role: Role) -> Option<bool> {
        match role {
            Role::Transcriber => self.is_correct,
            Role::Reviewer => self.corrected_is_correct,
            Role::FinalReviewer => self.reviewed_is_correct,
        }
    }

    /// Returns when the role last decided on this task.
    #[must_use]
    pub const fn decided_at(&self, role: Role) -> Option<DateTime<Utc>> {
        match role {
            Role::Transcriber => self.submitted_at,
            Role::Reviewer => self.reviewed_at,
            Role::FinalReviewer => self.final_reviewed_at,
        }
    }

    /// Returns rejections raised by the stage after `role`.
    #[must_use]
    pub const fn downstream_rejections(&self, role: Role) -> u32 {
        match role {
            Role::Transcriber => self.reviewer_rejected_count,
            Role::Reviewer => self.final_reviewer_rejected_count,
            Role::FinalReviewer => 0,
        }
    }

    /// Records the claiming user for the role's stage.
    ///
    /// Returns `false` without changes when the stage is already claimed.
    pub fn claim(&mut self, role: Role, user_id: UserId) -> bool {
        let slot = match role {
            Role::Transcriber => &mut self.transcriber_id,
            Role::Reviewer => &mut self.reviewer_id,
            Role::FinalReviewer => &mut self.final_reviewer_id,
        };
        if slot.is_some() {
            return false;
        }
        *slot = Some(user_id);
        true
    }

    /// Returns a copy with only the state advanced for `action`.
    #[must_use]
    pub fn with_next_state(&self, role: Role, action: Option<TaskAction>) -> Self {
        Self {
            state: role.next_state(action),
            ..self.clone()
        }
    }

    /// Applies a per-role stage update.
    pub fn apply(&mut self, update: &StageUpdate) {
        match update {
            StageUpdate::Transcription(change) => {
                self.state = change.state;
                if let Some(verdict) = change.is_correct {
                    self.is_correct = Some(verdict);
                }
                write_content(&mut self.corrected_context, &change.corrected_context);
                self.submitted_at = Some(change.submitted_at);
                self.duration.clone_from(&change.duration);
            }
            StageUpdate::Review(change) => {
                self.state = change.state;
                if let Some(verdict) = change.decision {
                    self.corrected_is_correct = Some(verdict);
                }
                write_content(&mut self.reviewed_context, &change.content);
                self.reviewed_at = Some(change.decided_at);
                if change.count_rejection {
                    self.reviewer_rejected_count = self.reviewer_rejected_count.saturating_add(1);
                }
            }
            StageUpdate::FinalReview(change) => {
                self.state = change.state;
                if let Some(verdict) = change.decision {
                    self.reviewed_is_correct = Some(verdict);
                }
                write_content(&mut self.final_reviewed_context, &change.content);
                self.final_reviewed_at = Some(change.decided_at);
                if change.count_rejection {
                    self.final_reviewer_rejected_count =
                        self.final_reviewer_rejected_count.saturating_add(1);
                }
            }
        }
    }
}

fn write_content(field: &mut Option<String>, write: &ContentWrite) {
    match write {
        ContentWrite::Keep => {}
        ContentWrite::Clear => *field = None,
        ContentWrite::Replace(text) => *field = Some(text.clone()),
    }
}
