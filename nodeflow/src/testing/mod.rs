//! Testing utilities for nodeflow pipelines.
//!
//! This module provides:
//! - Call-counting and order-recording components
//! - A component that always fails

mod mocks;

pub use mocks::{CountingComponent, ExecutionLog, FailingComponent, RecordingComponent};
