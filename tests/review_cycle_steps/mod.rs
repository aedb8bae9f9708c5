//! Step definitions for review cycle scenarios.

pub mod given;
pub mod when;
