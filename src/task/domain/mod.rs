//! Domain model for the annotation workflow.
//!
//! Tasks flow from transcription through review and final review. The
//! domain owns the state machine, batch ordering, stage update rules, and
//! the pure time and pay calculations, keeping storage concerns outside.

mod batch;
mod elapsed;
mod error;
mod ids;
mod pay;
mod progress;
mod task;
mod update;
mod user;
mod window;
mod workflow;

pub use batch::{BatchId, earliest_batch};
pub use elapsed::{MAX_SAFE_MILLIS, ZERO_ELAPSED, format_elapsed, format_elapsed_ms};
pub use error::{ParseRoleError, ParseTaskStateError, TaskDomainError};
pub use ids::{GroupId, TaskId, UserId};
pub use pay::{DEFAULT_COUNT_BASED_GROUPS, GroupPayPolicy, ReviewedWork, flat_pay, flat_rate};
pub use progress::ProgressStats;
pub use task::{PersistedTaskData, Task};
pub use update::{
    ContentWrite, EditedFields, ReviewUpdate, StageDecision, StageUpdate, TranscriptionUpdate,
};
pub use user::{Group, User};
pub use window::DecisionWindow;
pub use workflow::{Role, TaskAction, TaskState, next_state};
