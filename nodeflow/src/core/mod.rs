//! Core domain model types for nodeflow.
//!
//! This module contains the fundamental types used throughout the crate:
//! - The generic `Container` threaded through pipelines
//! - The text `Document` payload
//! - Node position and pipeline state enums

mod container;
mod document;
mod status;

pub use container::Container;
pub use document::Document;
pub use status::{PipelineState, Position};
