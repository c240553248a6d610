//! The public pipeline surface.

use super::compiler::CompiledPipeline;
use super::connectors::{DefaultInput, DefaultOutput, InputConnector, OutputConnector};
use super::graph::{NodeGraph, StageRegistry};
use super::{resolve_execution_order, Node, NodeOptions};
use crate::components::Component;
use crate::core::{Container, PipelineState};
use crate::errors::Result;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A named, mutable set of nodes that compiles into a single transformation.
///
/// `In` is the raw value accepted by [`Pipeline::invoke`] and `Out` the value
/// it returns. Both default to `Container<T>`.
///
/// Every structural change (`add_node`, `remove`, `replace`, connector
/// changes) drops the cached compiled pipeline, so the next invocation always
/// reflects the current nodes.
pub struct Pipeline<T, In = Container<T>, Out = Container<T>> {
    name: String,
    graph: NodeGraph<T>,
    input: Arc<dyn InputConnector<In, T>>,
    output: Arc<dyn OutputConnector<T, Out>>,
    compiled: Option<Arc<CompiledPipeline<T, In, Out>>>,
}

impl<T, In, Out> Pipeline<T, In, Out>
where
    T: 'static,
    In: Into<Container<T>>,
    Out: From<Container<T>>,
{
    /// Creates an empty pipeline with the default connectors.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_connectors(name, Arc::new(DefaultInput), Arc::new(DefaultOutput))
    }
}

impl<T: 'static, In, Out> Pipeline<T, In, Out> {
    /// Creates an empty pipeline with explicit connectors.
    #[must_use]
    pub fn with_connectors(
        name: impl Into<String>,
        input: Arc<dyn InputConnector<In, T>>,
        output: Arc<dyn OutputConnector<T, Out>>,
    ) -> Self {
        Self {
            name: name.into(),
            graph: NodeGraph::new(),
            input,
            output,
            compiled: None,
        }
    }

    /// Registers `component` as a node.
    ///
    /// Returns the component as given, not the schema-wrapped form.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an empty or duplicate name, or a
    /// relative position whose reference node does not exist.
    pub fn add_node(
        &mut self,
        component: Arc<dyn Component<T>>,
        options: NodeOptions<T>,
    ) -> Result<Arc<dyn Component<T>>> {
        let node = Node::new(Arc::clone(&component), options);
        self.graph.insert(node)?;
        self.invalidate();
        Ok(component)
    }

    /// Appends `component` with default options.
    ///
    /// # Errors
    ///
    /// Same as [`Pipeline::add_node`].
    pub fn append(&mut self, component: Arc<dyn Component<T>>) -> Result<Arc<dyn Component<T>>> {
        self.add_node(component, NodeOptions::new())
    }

    /// Removes the node named `name` and returns its component.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if no such node exists.
    pub fn remove(&mut self, name: &str) -> Result<Arc<dyn Component<T>>> {
        let node = self.graph.remove(name)?;
        self.invalidate();
        Ok(node.component)
    }

    /// Swaps the component of `name`, keeping position, stage,
    /// dependencies and schemas. Returns the previous component.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if no such node exists.
    pub fn replace(
        &mut self,
        name: &str,
        component: Arc<dyn Component<T>>,
    ) -> Result<Arc<dyn Component<T>>> {
        let previous = self.graph.replace(name, component)?;
        self.invalidate();
        Ok(previous)
    }
}

impl<T, In, Out> Pipeline<T, In, Out> {
    /// Sets the input connector.
    pub fn set_input_connector(&mut self, input: Arc<dyn InputConnector<In, T>>) {
        self.input = input;
        self.invalidate();
    }

    /// Sets the output connector.
    pub fn set_output_connector(&mut self, output: Arc<dyn OutputConnector<T, Out>>) {
        self.output = output;
        self.invalidate();
    }

    /// Compiles the current nodes and caches the result.
    ///
    /// Always recompiles, even if a compiled pipeline is cached.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown dependency and a
    /// circular dependency error if the dependencies do not form a DAG.
    pub fn build(&mut self) -> Result<Arc<CompiledPipeline<T, In, Out>>> {
        let compiled = Arc::new(CompiledPipeline::compile(
            &self.name,
            &self.graph,
            Arc::clone(&self.input),
            Arc::clone(&self.output),
        )?);
        self.compiled = Some(Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Runs the pipeline, compiling it first if nothing is cached.
    ///
    /// # Errors
    ///
    /// Propagates build errors, connector errors, validation errors and
    /// node failures unchanged.
    pub fn invoke(&mut self, data: impl Into<In>) -> Result<Out> {
        let compiled = match self.compiled {
            Some(ref compiled) => Arc::clone(compiled),
            None => self.build()?,
        };
        compiled.run(data.into())
    }

    /// Returns the cached compiled pipeline, if any.
    #[must_use]
    pub fn compiled(&self) -> Option<&Arc<CompiledPipeline<T, In, Out>>> {
        self.compiled.as_ref()
    }

    /// Returns true if a compiled pipeline is cached.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.compiled.is_some()
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub fn state(&self) -> PipelineState {
        if self.compiled.is_some() {
            PipelineState::Built
        } else if self.graph.is_empty() {
            PipelineState::Empty
        } else {
            PipelineState::Configured
        }
    }

    /// Resolves the execution order without compiling.
    ///
    /// # Errors
    ///
    /// Same as [`Pipeline::build`].
    pub fn execution_order(&self) -> Result<Vec<String>> {
        let nodes = self.graph.nodes();
        Ok(resolve_execution_order(nodes)?
            .into_iter()
            .map(|i| nodes[i].name.clone())
            .collect())
    }

    /// Returns the pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the node names in structural order.
    #[must_use]
    pub fn node_names(&self) -> Vec<String> {
        self.graph.names()
    }

    /// Returns the node named `name`.
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&Node<T>> {
        self.graph.get(name)
    }

    /// Returns true if a node named `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.graph.contains(name)
    }

    /// Returns the stage registry.
    #[must_use]
    pub fn stages(&self) -> &StageRegistry {
        self.graph.stages()
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    /// Returns true if the pipeline has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    fn invalidate(&mut self) {
        if self.compiled.take().is_some() {
            debug!(pipeline = %self.name, "Invalidated compiled pipeline");
        }
    }
}

impl<T, In, Out> fmt::Display for Pipeline<T, In, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.graph.stages())
    }
}

impl<T, In, Out> fmt::Debug for Pipeline<T, In, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("nodes", &self.graph.names())
            .field("state", &self.state())
            .finish()
    }
}
