//! Application services for the annotation workflow.

mod allocation;
mod error;
mod export;
mod history;
mod update;
mod workflow;

pub use allocation::TaskAllocationService;
pub use error::{MissingEntity, StoreFailure, WorkflowError, WorkflowResult};
pub use export::{EXPORT_HEADERS, TaskExportService};
pub use history::TaskHistoryService;
pub use update::{TaskUpdateService, UpdateOutcome, UpdateTaskRequest};
pub use workflow::{UserWorkspace, WorkflowService};
