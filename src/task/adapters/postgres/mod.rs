//! `PostgreSQL` adapters for annotation persistence.

mod directory;
mod models;
mod repository;
mod schema;

pub use directory::PostgresUserDirectory;
pub use repository::{PostgresTaskRepository, TaskPgPool};
