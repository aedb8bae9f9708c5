//! Scriptorium: multi-stage text annotation workflow.
//!
//! This crate moves raw text items through transcription, review and final
//! review. It hands each user a batch of work, applies their decisions
//! through a linear state machine, and reports history, progress, pay and
//! exports.
//!
//! # Architecture
//!
//! Scriptorium follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, in-memory)
//!
//! # Modules
//!
//! - [`task`]: Task state machine, allocation, updates and reporting
//! - [`config`]: Workflow tunables
//! - [`delimited`]: Comma-separated export helpers

pub mod config;
pub mod delimited;
pub mod task;
