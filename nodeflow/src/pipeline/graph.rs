//! Ordered node list with positional insertion and stage grouping.

use super::Node;
use crate::components::Component;
use crate::core::Position;
use crate::errors::{ConfigurationError, LookupError, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Stage name to node names, for introspection only.
///
/// Entries are keyed on node names so that removal always finds them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageRegistry {
    stages: HashMap<String, Vec<String>>,
    /// Insertion order for stages.
    stage_order: Vec<String>,
}

impl StageRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `node` to `stage`, creating the stage if needed.
    pub fn register(&mut self, stage: &str, node: &str) {
        if !self.stages.contains_key(stage) {
            self.stage_order.push(stage.to_string());
        }
        self.stages
            .entry(stage.to_string())
            .or_default()
            .push(node.to_string());
    }

    /// Removes `node` from `stage`; drops the stage once it is empty.
    pub fn unregister(&mut self, stage: &str, node: &str) -> bool {
        let Some(members) = self.stages.get_mut(stage) else {
            return false;
        };
        let before = members.len();
        members.retain(|m| m != node);
        let removed = members.len() != before;

        if members.is_empty() {
            self.stages.remove(stage);
            self.stage_order.retain(|s| s != stage);
        }
        removed
    }

    /// Returns the node names in `stage`.
    #[must_use]
    pub fn get(&self, stage: &str) -> Option<&[String]> {
        self.stages.get(stage).map(Vec::as_slice)
    }

    /// Iterates stages in the order they were first used.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.stage_order
            .iter()
            .filter_map(|s| self.stages.get(s).map(|m| (s.as_str(), m.as_slice())))
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stage_order.len()
    }

    /// Returns true if no stage is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stage_order.is_empty()
    }
}

impl fmt::Display for StageRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (stage, members) in self.iter() {
            writeln!(f, "{stage}:")?;
            for member in members {
                writeln!(f, "  - {member}")?;
            }
        }
        Ok(())
    }
}

/// The structural node list of a pipeline.
pub struct NodeGraph<T> {
    nodes: Vec<Node<T>>,
    stages: StageRegistry,
}

impl<T> Default for NodeGraph<T> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            stages: StageRegistry::new(),
        }
    }
}

impl<T: 'static> NodeGraph<T> {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node at its requested position and returns its index.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an empty or duplicate name, or for
    /// `After`/`Before` without an existing reference node.
    pub fn insert(&mut self, node: Node<T>) -> Result<usize> {
        if node.name.trim().is_empty() {
            return Err(ConfigurationError::new(
                "CONFIG-INVALID_NAME",
                "Node name cannot be empty or whitespace-only",
            )
            .into());
        }
        if self.contains(&node.name) {
            return Err(ConfigurationError::duplicate_name(&node.name).into());
        }

        let index = self.insertion_index(node.position, node.reference.as_deref())?;

        if let Some(ref stage) = node.stage {
            self.stages.register(stage, &node.name);
        }
        debug!(
            node = %node.name,
            position = %node.position,
            index,
            "Inserted node"
        );
        self.nodes.insert(index, node);
        Ok(index)
    }

    /// Removes the node named `name`.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if no such node exists.
    pub fn remove(&mut self, name: &str) -> Result<Node<T>> {
        let index = self.index_of(name).ok_or_else(|| LookupError::new(name))?;
        let node = self.nodes.remove(index);

        if let Some(ref stage) = node.stage {
            self.stages.unregister(stage, &node.name);
        }
        debug!(node = %node.name, index, "Removed node");
        Ok(node)
    }

    /// Swaps the component of `name`, keeping its metadata.
    ///
    /// Returns the previous component.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if no such node exists.
    pub fn replace(
        &mut self,
        name: &str,
        component: Arc<dyn Component<T>>,
    ) -> Result<Arc<dyn Component<T>>> {
        let index = self.index_of(name).ok_or_else(|| LookupError::new(name))?;
        let replacement = self.nodes[index].with_component(component);
        let previous = std::mem::replace(&mut self.nodes[index], replacement);
        debug!(
            node = name,
            previous = previous.component.name(),
            "Replaced node component"
        );
        Ok(previous.component)
    }

    fn insertion_index(&self, position: Position, reference: Option<&str>) -> Result<usize> {
        match position {
            Position::First => Ok(0),
            Position::Last | Position::Default => Ok(self.nodes.len()),
            Position::After | Position::Before => {
                let index = reference
                    .and_then(|r| self.index_of(r))
                    .ok_or_else(|| {
                        ConfigurationError::missing_reference(position.as_str(), reference)
                    })?;
                Ok(if position == Position::After {
                    index + 1
                } else {
                    index
                })
            }
        }
    }
}

impl<T> NodeGraph<T> {
    /// Returns the index of the node named `name`.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.name == name)
    }

    /// Returns true if a node named `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Returns the node named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Node<T>> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Returns the nodes in structural order.
    #[must_use]
    pub fn nodes(&self) -> &[Node<T>] {
        &self.nodes
    }

    /// Returns the node names in structural order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.name.clone()).collect()
    }

    /// Returns the stage registry.
    #[must_use]
    pub fn stages(&self) -> &StageRegistry {
        &self.stages
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<T> fmt::Debug for NodeGraph<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeGraph")
            .field("nodes", &self.nodes)
            .field("stages", &self.stages)
            .finish()
    }
}
