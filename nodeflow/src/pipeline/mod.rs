//! Pipeline building and execution.
//!
//! This module provides:
//! - Node records and positional insertion
//! - Dependency resolution with cycle detection
//! - The compiler and the cached pipeline facade
//! - Input/output connectors
//! - Pipeline definitions, model factories and declarative configs

mod compiler;
mod connectors;
mod definition;
mod facade;
mod graph;
mod node;
mod registry;
mod resolver;

#[cfg(test)]
mod integration_tests;

pub use compiler::CompiledPipeline;
pub use connectors::{DefaultInput, DefaultOutput, FnInput, FnOutput, InputConnector, OutputConnector};
pub use definition::{ModelConfig, ModelSource, PipelineDefinition};
pub use facade::Pipeline;
pub use graph::{NodeGraph, StageRegistry};
pub use node::{Node, NodeOptions};
pub use registry::{ComponentFactory, ComponentRegistry, NodeConfig, PipelineConfig};
pub use resolver::resolve_execution_order;
