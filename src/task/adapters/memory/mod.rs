//! In-memory adapters for the annotation workflow.

mod directory;
mod task;
mod view_cache;

pub use directory::InMemoryUserDirectory;
pub use task::InMemoryTaskRepository;
pub use view_cache::{DisabledTaskViewCache, InMemoryTaskViewCache};
