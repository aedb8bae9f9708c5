//! Error types for task domain validation and parsing.

use super::{Role, TaskId, TaskState};
use thiserror::Error;

/// Errors returned while validating workflow decisions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// A submit was attempted without a yes/no decision.
    #[error("a yes/no decision is required before submitting")]
    MissingDecision,

    /// A "no" decision arrived without correction text.
    #[error("correction text must not be empty when the suggestion is marked incorrect")]
    EmptyCorrection,

    /// The task is not in the queue owned by the acting role.
    #[error("task {task_id} is {state}, which is not in the {role} queue")]
    StageMismatch {
        /// Task identifier.
        task_id: TaskId,
        /// Acting role.
        role: Role,
        /// Current task state.
        state: TaskState,
    },

    /// The requested export window ends before it starts.
    #[error("export window is empty: start is after end")]
    InvalidDateRange,
}

/// Error returned while parsing task states from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task state: {0}")]
pub struct ParseTaskStateError(pub String);

/// Error returned while parsing a role name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid role provided: {0}")]
pub struct ParseRoleError(pub String);
