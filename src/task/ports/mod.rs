//! Port contracts for the annotation workflow.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod directory;
pub mod repository;
pub mod view_cache;

pub use directory::{UserDirectory, UserDirectoryError, UserDirectoryResult};
pub use repository::{StageQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult};
pub use view_cache::TaskViewCache;
