//! # Nodeflow
//!
//! A pipeline-composition engine.
//!
//! Nodeflow lets you register named processing steps ("nodes") that transform
//! a generic [`Container`](core::Container), with support for:
//!
//! - **Positional insertion**: first, last, or before/after a named node
//! - **Dependencies**: declared dependencies override structural order, with
//!   cycle detection
//! - **Stages**: named groups of nodes for introspection
//! - **Contracts**: input/output schemas enforced around a component
//! - **Lifecycle**: add, remove and replace nodes; the compiled pipeline is
//!   rebuilt on the next invocation
//!
//! ## Quick Start
//!
//! ```rust
//! use nodeflow::prelude::*;
//! use std::sync::Arc;
//!
//! let mut pipeline: Pipeline<i32> = Pipeline::new("math");
//! pipeline.append(Arc::new(map_fn("double", |x: i32| x * 2)))?;
//! pipeline.append(Arc::new(map_fn("increment", |x: i32| x + 1)))?;
//!
//! assert_eq!(pipeline.invoke(3)?.payload, 7);
//! # Ok::<(), nodeflow::errors::PipelineError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod components;
pub mod contracts;
pub mod core;
pub mod errors;
pub mod observability;
pub mod pipeline;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::components::{map_fn, Component, FnComponent, NoOpComponent};
    pub use crate::contracts::{
        FieldViolation, FnSchema, ModelSchema, RequiredFields, Schema, Validate,
    };
    pub use crate::core::{Container, Document, PipelineState, Position};
    pub use crate::errors::{
        CircularDependencyError, ConfigurationError, ContractErrorInfo, LookupError,
        PipelineError, ValidationError,
    };
    pub use crate::observability::{init_tracing, LogFormat, TracingConfig};
    pub use crate::pipeline::{
        CompiledPipeline, ComponentRegistry, InputConnector, ModelConfig, ModelSource,
        NodeOptions, OutputConnector, Pipeline, PipelineConfig, PipelineDefinition,
    };
}
