//! Per-role stage update descriptors and decision resolution.
//!
//! Each role writes a fixed set of columns. [`StageUpdate`] names that set
//! explicitly so adapters persist exactly what the role owns.

use super::{Role, Task, TaskAction, TaskDomainError, TaskState};
use chrono::{DateTime, Utc};

/// Write applied to a lineage content field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentWrite {
    /// Leave the stored value untouched.
    Keep,
    /// Store `NULL`.
    Clear,
    /// Store the given text.
    Replace(String),
}

impl ContentWrite {
    /// Returns the column value to write, or `None` to skip the column.
    #[must_use]
    pub fn as_column(&self) -> Option<Option<String>> {
        match self {
            Self::Keep => None,
            Self::Clear => Some(None),
            Self::Replace(text) => Some(Some(text.clone())),
        }
    }
}

/// Columns written when a transcriber decides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionUpdate {
    /// New lifecycle state.
    pub state: TaskState,
    /// Verdict on the suggestion, when given.
    pub is_correct: Option<bool>,
    /// Write to `corrected_context`.
    pub corrected_context: ContentWrite,
    /// Decision timestamp.
    pub submitted_at: DateTime<Utc>,
    /// Handling time; `None` clears the column.
    pub duration: Option<String>,
}

/// Columns written when a reviewer or final reviewer decides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewUpdate {
    /// New lifecycle state.
    pub state: TaskState,
    /// Verdict on the upstream text, when given.
    pub decision: Option<bool>,
    /// Write to the role's output column.
    pub content: ContentWrite,
    /// Decision timestamp.
    pub decided_at: DateTime<Utc>,
    /// Whether the role's rejection counter is incremented.
    pub count_rejection: bool,
}

/// Stage update tagged by the acting role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageUpdate {
    /// Transcriber decision.
    Transcription(TranscriptionUpdate),
    /// Reviewer decision.
    Review(ReviewUpdate),
    /// Final reviewer decision.
    FinalReview(ReviewUpdate),
}

/// Inputs for building a [`StageUpdate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageDecision {
    /// Acting role.
    pub role: Role,
    /// State computed by the state machine.
    pub new_state: TaskState,
    /// Verdict, when given.
    pub verdict: Option<bool>,
    /// Resolved output text, when any.
    pub output: Option<String>,
    /// Decision timestamp.
    pub decided_at: DateTime<Utc>,
    /// Handling time, present only on forward progress. Only the
    /// transcriber records it.
    pub duration: Option<String>,
}

impl StageUpdate {
    /// Builds the descriptor for a role's decision.
    ///
    /// Trashing clears the transcriber output; any reviewer outcome other
    /// than forward progress clears the reviewer output. Rejections bump the
    /// acting role's counter.
    #[must_use]
    pub fn from_decision(decision: StageDecision) -> Self {
        let StageDecision {
            role,
            new_state,
            verdict,
            output,
            decided_at,
            duration,
        } = decision;
        let provided = output.map_or(ContentWrite::Keep, ContentWrite::Replace);

        match role {
            Role::Transcriber => {
                let corrected_context = if new_state == TaskState::Trashed {
                    ContentWrite::Clear
                } else {
                    provided
                };
                Self::Transcription(TranscriptionUpdate {
                    state: new_state,
                    is_correct: verdict,
                    corrected_context,
                    submitted_at: decided_at,
                    duration,
                })
            }
            Role::Reviewer | Role::FinalReviewer => {
                let content = if new_state == role.forward_state() {
                    provided
                } else {
                    ContentWrite::Clear
                };
                let update = ReviewUpdate {
                    state: new_state,
                    decision: verdict,
                    content,
                    decided_at,
                    count_rejection: role.reject_state() == Some(new_state),
                };
                if role == Role::Reviewer {
                    Self::Review(update)
                } else {
                    Self::FinalReview(update)
                }
            }
        }
    }

    /// Returns the role that produced this update.
    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::Transcription(_) => Role::Transcriber,
            Self::Review(_) => Role::Reviewer,
            Self::FinalReview(_) => Role::FinalReviewer,
        }
    }

    /// Returns the state written by this update.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        match self {
            Self::Transcription(change) => change.state,
            Self::Review(change) | Self::FinalReview(change) => change.state,
        }
    }

    /// Returns `true` when this update sends the task back a stage.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        match self {
            Self::Transcription(_) => false,
            Self::Review(change) | Self::FinalReview(change) => change.count_rejection,
        }
    }
}

/// Fields edited by the annotator before acting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditedFields {
    /// Yes/no verdict on the upstream text.
    pub is_correct: Option<bool>,
    /// Replacement text when the verdict is "no".
    pub correction: Option<String>,
}

impl EditedFields {
    /// Creates an empty edit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the upstream text as correct.
    #[must_use]
    pub fn approve() -> Self {
        Self {
            is_correct: Some(true),
            correction: None,
        }
    }

    /// Marks the upstream text as incorrect with a replacement.
    #[must_use]
    pub fn correct(correction: impl Into<String>) -> Self {
        Self {
            is_correct: Some(false),
            correction: Some(correction.into()),
        }
    }

    /// Resolves the output text for the role.
    ///
    /// "Yes" copies the upstream text verbatim; "no" takes the correction.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyCorrection`] for "no" without
    /// non-blank text and [`TaskDomainError::MissingDecision`] when a submit
    /// carries no verdict.
    pub fn resolve_output(
        &self,
        task: &Task,
        role: Role,
        action: Option<TaskAction>,
    ) -> Result<Option<String>, TaskDomainError> {
        match self.is_correct {
            Some(true) => Ok(Some(task.stage_input(role).unwrap_or_default().to_owned())),
            Some(false) => match self.correction.as_deref() {
                Some(text) if !text.trim().is_empty() => Ok(Some(text.to_owned())),
                _ => Err(TaskDomainError::EmptyCorrection),
            },
            None if action == Some(TaskAction::Submit) => Err(TaskDomainError::MissingDecision),
            None => Ok(None),
        }
    }
}
