//! Inclusive time window over stage decision timestamps.

use super::{Task, TaskDomainError};
use chrono::{DateTime, Utc};

/// Inclusive `[from, to]` window matched against decision timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionWindow {
    from: DateTime<Utc>,
    to: DateTime<Utc>,
}

impl DecisionWindow {
    /// Creates a window.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidDateRange`] when `from` is after `to`.
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self, TaskDomainError> {
        if from > to {
            return Err(TaskDomainError::InvalidDateRange);
        }
        Ok(Self { from, to })
    }

    /// Returns the window start.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.from
    }

    /// Returns the window end.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.to
    }

    /// Returns `true` when the instant falls inside the window.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.from <= instant && instant <= self.to
    }

    /// Returns `true` when any stage decision of the task falls inside.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        [task.submitted_at(), task.reviewed_at(), task.final_reviewed_at()]
            .into_iter()
            .flatten()
            .any(|instant| self.contains(instant))
    }
}
