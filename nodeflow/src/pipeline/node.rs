//! Node records and insertion options.

use crate::components::Component;
use crate::contracts::{Schema, SchemaPair, ValidatedComponent};
use crate::core::Position;
use std::fmt;
use std::sync::Arc;

/// Options controlling where and how a node is inserted.
pub struct NodeOptions<T> {
    /// Node name; defaults to the component's name.
    pub name: Option<String>,
    /// Requested placement.
    pub position: Position,
    /// Reference node for `After`/`Before`.
    pub reference: Option<String>,
    /// Stage label for introspection.
    pub stage: Option<String>,
    /// Names of nodes that must run earlier.
    pub dependencies: Vec<String>,
    /// Payload contracts.
    pub schemas: SchemaPair<T>,
}

impl<T> Default for NodeOptions<T> {
    fn default() -> Self {
        Self {
            name: None,
            position: Position::Default,
            reference: None,
            stage: None,
            dependencies: Vec::new(),
            schemas: SchemaPair::default(),
        }
    }
}

impl<T> NodeOptions<T> {
    /// Creates default options (append, no stage, no dependencies).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the node name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the position.
    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Sets the reference node.
    #[must_use]
    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Inserts at the front.
    #[must_use]
    pub fn first(self) -> Self {
        self.position(Position::First)
    }

    /// Appends at the end.
    #[must_use]
    pub fn last(self) -> Self {
        self.position(Position::Last)
    }

    /// Inserts directly after `reference`.
    #[must_use]
    pub fn after(self, reference: impl Into<String>) -> Self {
        self.position(Position::After).reference(reference)
    }

    /// Inserts directly before `reference`.
    #[must_use]
    pub fn before(self, reference: impl Into<String>) -> Self {
        self.position(Position::Before).reference(reference)
    }

    /// Sets the stage label.
    #[must_use]
    pub fn stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    /// Sets the dependencies.
    #[must_use]
    pub fn depends_on(mut self, deps: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the input schema.
    #[must_use]
    pub fn input_schema(mut self, schema: Arc<dyn Schema<T>>) -> Self {
        self.schemas.input = Some(schema);
        self
    }

    /// Sets the output schema.
    #[must_use]
    pub fn output_schema(mut self, schema: Arc<dyn Schema<T>>) -> Self {
        self.schemas.output = Some(schema);
        self
    }
}

impl<T> fmt::Debug for NodeOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeOptions")
            .field("name", &self.name)
            .field("position", &self.position)
            .field("reference", &self.reference)
            .field("stage", &self.stage)
            .field("dependencies", &self.dependencies)
            .field("schemas", &self.schemas)
            .finish()
    }
}

/// One registered processing step.
pub struct Node<T> {
    /// Unique name within the pipeline.
    pub name: String,
    /// The component as registered.
    pub component: Arc<dyn Component<T>>,
    /// What the compiler runs: `component`, wrapped if schemas are set.
    runner: Arc<dyn Component<T>>,
    /// Requested placement at insertion time.
    pub position: Position,
    /// Reference node for `After`/`Before`.
    pub reference: Option<String>,
    /// Stage label.
    pub stage: Option<String>,
    /// Names of nodes that must run earlier.
    pub dependencies: Vec<String>,
    /// Payload contracts.
    pub schemas: SchemaPair<T>,
}

impl<T: 'static> Node<T> {
    /// Builds a node from a component and its options.
    #[must_use]
    pub fn new(component: Arc<dyn Component<T>>, options: NodeOptions<T>) -> Self {
        let name = options
            .name
            .unwrap_or_else(|| component.name().to_string());
        let runner = ValidatedComponent::wrap(Arc::clone(&component), &options.schemas);
        Self {
            name,
            component,
            runner,
            position: options.position,
            reference: options.reference,
            stage: options.stage,
            dependencies: options.dependencies,
            schemas: options.schemas,
        }
    }

    /// Returns a node with the same metadata and a different component.
    #[must_use]
    pub fn with_component(&self, component: Arc<dyn Component<T>>) -> Self {
        let runner = ValidatedComponent::wrap(Arc::clone(&component), &self.schemas);
        Self {
            name: self.name.clone(),
            component,
            runner,
            position: self.position,
            reference: self.reference.clone(),
            stage: self.stage.clone(),
            dependencies: self.dependencies.clone(),
            schemas: self.schemas.clone(),
        }
    }
}

impl<T> Node<T> {
    /// Returns the component the compiler runs.
    #[must_use]
    pub fn runner(&self) -> &Arc<dyn Component<T>> {
        &self.runner
    }

    /// Returns true if the node carries input or output schemas.
    #[must_use]
    pub fn is_validated(&self) -> bool {
        !self.schemas.is_empty()
    }
}

impl<T> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("component", &self.component.name())
            .field("position", &self.position)
            .field("reference", &self.reference)
            .field("stage", &self.stage)
            .field("dependencies", &self.dependencies)
            .finish()
    }
}
