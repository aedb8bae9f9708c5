//! Unit tests for the annotation workflow.

mod support;
