//! Named component constructors and declarative pipeline configs.
//!
//! A [`ComponentRegistry`] is passed explicitly to whatever assembles a
//! pipeline; there is no process-wide registry.

use super::{NodeOptions, Pipeline};
use crate::components::Component;
use crate::core::{Container, Position};
use crate::errors::{ConfigurationError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Builds a component from its JSON parameters.
pub type ComponentFactory<T> =
    Arc<dyn Fn(&serde_json::Value) -> Result<Arc<dyn Component<T>>> + Send + Sync>;

/// Maps component names to constructors.
pub struct ComponentRegistry<T> {
    factories: HashMap<String, ComponentFactory<T>>,
}

impl<T> Default for ComponentRegistry<T> {
    fn default() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }
}

impl<T> Clone for ComponentRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            factories: self.factories.clone(),
        }
    }
}

impl<T> ComponentRegistry<T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&serde_json::Value) -> Result<Arc<dyn Component<T>>> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
        self
    }

    /// Builds the component registered as `name`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unregistered name, and
    /// propagates errors from the factory.
    pub fn create(&self, name: &str, params: &serde_json::Value) -> Result<Arc<dyn Component<T>>> {
        let factory = self.factories.get(name).ok_or_else(|| {
            ConfigurationError::new(
                "CONFIG-UNKNOWN_COMPONENT",
                format!("Component '{name}' is not registered"),
            )
            .with_context_entry("available", self.names().join(", "))
        })?;
        factory(params)
    }

    /// Returns true if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Returns the registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl<T> fmt::Debug for ComponentRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("components", &self.names())
            .finish()
    }
}

#[cfg(feature = "text")]
impl ComponentRegistry<crate::core::Document> {
    /// Creates a registry holding the built-in text components:
    /// `lowercase`, `strip_punctuation` (optional `pattern` param) and
    /// `tokenize`.
    #[must_use]
    pub fn with_text_components() -> Self {
        use crate::components::text::{Lowercase, StripPunctuation, WhitespaceTokenizer};

        let mut registry = Self::new();
        registry
            .register("lowercase", |_| Ok(Arc::new(Lowercase::new())))
            .register("strip_punctuation", |params| {
                let component = match params.get("pattern").and_then(serde_json::Value::as_str) {
                    Some(pattern) => StripPunctuation::with_pattern(pattern)?,
                    None => StripPunctuation::new()?,
                };
                Ok(Arc::new(component))
            })
            .register("tokenize", |_| Ok(Arc::new(WhitespaceTokenizer::new())));
        registry
    }
}

fn default_position() -> String {
    Position::Default.as_str().to_string()
}

/// One node entry of a [`PipelineConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Registered component name.
    pub component: String,
    /// Node name; defaults to the component's own name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// One of `first`, `last`, `default`, `after`, `before`.
    #[serde(default = "default_position")]
    pub position: String,
    /// Reference node for `after`/`before`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Stage label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    /// Nodes that must run earlier.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Parameters passed to the component factory.
    #[serde(default)]
    pub params: serde_json::Value,
}

impl NodeConfig {
    /// Creates an entry for `component` with default placement.
    #[must_use]
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            name: None,
            position: default_position(),
            reference: None,
            stage: None,
            dependencies: Vec::new(),
            params: serde_json::Value::Null,
        }
    }

    fn options<T>(&self) -> Result<NodeOptions<T>> {
        let position: Position = self.position.parse()?;
        Ok(NodeOptions {
            name: self.name.clone(),
            position,
            reference: self.reference.clone(),
            stage: self.stage.clone(),
            dependencies: self.dependencies.clone(),
            ..NodeOptions::default()
        })
    }
}

/// A declarative pipeline: a name and an ordered list of nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Pipeline name.
    pub name: String,
    /// Nodes, added in order.
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

impl PipelineConfig {
    /// Parses a config from JSON.
    ///
    /// # Errors
    ///
    /// Returns a serialization error for malformed JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be read and a serialization
    /// error for malformed JSON.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

impl<T, In, Out> Pipeline<T, In, Out>
where
    T: 'static,
    In: Into<Container<T>>,
    Out: From<Container<T>>,
{
    /// Assembles a pipeline from `config` using components from `registry`.
    ///
    /// # Errors
    ///
    /// Returns the first error from [`Pipeline::apply_config`].
    pub fn from_config(config: &PipelineConfig, registry: &ComponentRegistry<T>) -> Result<Self> {
        let mut pipeline = Self::new(config.name.clone());
        pipeline.apply_config(config, registry)?;
        Ok(pipeline)
    }
}

impl<T: 'static, In, Out> Pipeline<T, In, Out> {
    /// Adds every node of `config`, in order.
    ///
    /// Nodes added before a failing entry stay in the pipeline.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unregistered component or an
    /// invalid position, and any error from [`Pipeline::add_node`].
    pub fn apply_config(
        &mut self,
        config: &PipelineConfig,
        registry: &ComponentRegistry<T>,
    ) -> Result<()> {
        for entry in &config.nodes {
            let component = registry.create(&entry.component, &entry.params)?;
            self.add_node(component, entry.options()?)?;
            debug!(
                pipeline = %self.name(),
                component = %entry.component,
                "Added configured node"
            );
        }
        Ok(())
    }
}
