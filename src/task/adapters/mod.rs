//! Adapter implementations of the task ports.
//!
//! - [`memory`]: lock-guarded in-process stores for tests and embedding
//! - [`postgres`]: Diesel-backed `PostgreSQL` persistence

pub mod memory;
pub mod postgres;
