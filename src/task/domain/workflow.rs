//! Roles, task states, and the role-driven task state machine.
//!
//! Every non-terminal state is owned by exactly one role queue:
//!
//! | Role | submit | trash | reject | default |
//! |---|---|---|---|---|
//! | `TRANSCRIBER` | `submitted` | `trashed` | n/a | `transcribing` |
//! | `REVIEWER` | `accepted` | n/a | `transcribing` | `submitted` |
//! | `FINAL_REVIEWER` | `finalised` | n/a | `submitted` | `accepted` |
//!
//! Actions missing from a role's row resolve to that role's default state.

use super::{ParseRoleError, ParseTaskStateError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Annotator role. Fixed for the lifetime of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Checks the machine suggestion against the diplomatic source.
    Transcriber,
    /// Reviews transcriber output.
    Reviewer,
    /// Signs off reviewer output.
    FinalReviewer,
}

impl Role {
    /// Every role in pipeline order.
    pub const ALL: [Self; 3] = [Self::Transcriber, Self::Reviewer, Self::FinalReviewer];

    /// Returns the canonical role name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transcriber => "TRANSCRIBER",
            Self::Reviewer => "REVIEWER",
            Self::FinalReviewer => "FINAL_REVIEWER",
        }
    }

    /// State of the tasks sitting in this role's queue.
    #[must_use]
    pub const fn owner_state(self) -> TaskState {
        match self {
            Self::Transcriber => TaskState::Transcribing,
            Self::Reviewer => TaskState::Submitted,
            Self::FinalReviewer => TaskState::Accepted,
        }
    }

    /// State a task reaches when this role submits it.
    #[must_use]
    pub const fn forward_state(self) -> TaskState {
        match self {
            Self::Transcriber => TaskState::Submitted,
            Self::Reviewer => TaskState::Accepted,
            Self::FinalReviewer => TaskState::Finalised,
        }
    }

    /// State a task falls back to when this role rejects it.
    #[must_use]
    pub const fn reject_state(self) -> Option<TaskState> {
        match self {
            Self::Transcriber => None,
            Self::Reviewer => Some(TaskState::Transcribing),
            Self::FinalReviewer => Some(TaskState::Submitted),
        }
    }

    /// States listed in this role's decision history.
    #[must_use]
    pub const fn history_states(self) -> &'static [TaskState] {
        match self {
            Self::Transcriber => &[TaskState::Submitted, TaskState::Trashed],
            Self::Reviewer => &[TaskState::Accepted],
            Self::FinalReviewer => &[TaskState::Finalised],
        }
    }

    /// Returns `true` once a task has moved past this role's stage.
    #[must_use]
    pub const fn has_passed_stage(self, state: TaskState) -> bool {
        match self {
            Self::Transcriber => !matches!(state, TaskState::Transcribing),
            Self::Reviewer => matches!(state, TaskState::Accepted | TaskState::Finalised),
            Self::FinalReviewer => matches!(state, TaskState::Finalised),
        }
    }

    /// Computes the next state for an action taken by this role.
    #[must_use]
    pub const fn next_state(self, action: Option<TaskAction>) -> TaskState {
        match (self, action) {
            (Self::Transcriber, Some(TaskAction::Trash)) => TaskState::Trashed,
            (_, Some(TaskAction::Submit)) => self.forward_state(),
            (Self::Reviewer, Some(TaskAction::Reject)) => TaskState::Transcribing,
            (Self::FinalReviewer, Some(TaskAction::Reject)) => TaskState::Submitted,
            _ => self.owner_state(),
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "TRANSCRIBER" => Ok(Self::Transcriber),
            "REVIEWER" => Ok(Self::Reviewer),
            "FINAL_REVIEWER" => Ok(Self::FinalReviewer),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Waiting for, or held by, a transcriber.
    Transcribing,
    /// Transcribed and waiting for review.
    Submitted,
    /// Reviewed and waiting for final review.
    Accepted,
    /// Signed off. Terminal.
    Finalised,
    /// Discarded by a transcriber. Terminal.
    Trashed,
}

impl TaskState {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transcribing => "transcribing",
            Self::Submitted => "submitted",
            Self::Accepted => "accepted",
            Self::Finalised => "finalised",
            Self::Trashed => "trashed",
        }
    }

    /// Returns the role whose queue holds tasks in this state.
    #[must_use]
    pub const fn owner(self) -> Option<Role> {
        match self {
            Self::Transcribing => Some(Role::Transcriber),
            Self::Submitted => Some(Role::Reviewer),
            Self::Accepted => Some(Role::FinalReviewer),
            Self::Finalised | Self::Trashed => None,
        }
    }

    /// Returns `true` for states no queue owns.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        self.owner().is_none()
    }
}

impl TryFrom<&str> for TaskState {
    type Error = ParseTaskStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "transcribing" => Ok(Self::Transcribing),
            "submitted" => Ok(Self::Submitted),
            "accepted" => Ok(Self::Accepted),
            "finalised" => Ok(Self::Finalised),
            "trashed" => Ok(Self::Trashed),
            _ => Err(ParseTaskStateError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decision action sent by the annotation UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskAction {
    /// Move the task forward.
    Submit,
    /// Discard the task.
    Trash,
    /// Send the task back one stage.
    Reject,
}

impl TaskAction {
    /// Parses an action name; unrecognised names yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "submit" => Some(Self::Submit),
            "trash" => Some(Self::Trash),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }

    /// Returns the canonical action name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Trash => "trash",
            Self::Reject => "reject",
        }
    }

    /// Confirmation shown after the action persisted.
    #[must_use]
    pub const fn success_message(action: Option<Self>) -> &'static str {
        match action {
            Some(Self::Submit) => "Task is submitted successfully",
            Some(Self::Trash) => "Task is trashed successfully",
            Some(Self::Reject) => "Task is rejected successfully",
            None => "Action performed successfully",
        }
    }
}

/// Computes the next state for a role and a raw action name.
///
/// Unknown action names resolve to the role's default state.
#[must_use]
pub fn next_state(role: Role, action: &str) -> TaskState {
    role.next_state(TaskAction::parse(action))
}
