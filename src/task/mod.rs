//! Task allocation, review and reporting.
//!
//! Tasks pass from transcribers to reviewers to final reviewers. Each stage
//! claims work in batches, decides on it, and may send it back upstream.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
