//! Throughput counters for a user's stage.

use super::{Role, Task, TaskState};
use serde::{Deserialize, Serialize};

/// Aggregate progress of one user in one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressStats {
    /// Assigned tasks that have left the user's queue.
    pub completed: usize,
    /// Tasks ever assigned to the user for the role.
    pub total: usize,
    /// Completed tasks that were neither trashed nor sent back.
    pub passed: usize,
}

impl ProgressStats {
    /// Tallies the tasks assigned to a user for `role`.
    #[must_use]
    pub fn tally<'a>(role: Role, assigned: impl IntoIterator<Item = &'a Task>) -> Self {
        assigned
            .into_iter()
            .fold(Self::default(), |mut stats, task| {
                stats.total += 1;
                if role.has_passed_stage(task.state()) {
                    stats.completed += 1;
                    if task.state() != TaskState::Trashed && task.downstream_rejections(role) == 0
                    {
                        stats.passed += 1;
                    }
                }
                stats
            })
    }
}
