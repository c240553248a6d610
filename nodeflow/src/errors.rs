//! Error types for nodeflow pipelines.
//!
//! Every failure is raised synchronously to the caller of the mutating,
//! building or invoking operation. Nothing is retried or suppressed.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T, E = PipelineError> = std::result::Result<T, E>;

/// The main error type for pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid pipeline configuration.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),

    /// The dependency graph contains a cycle.
    #[error("{0}")]
    CircularDependency(#[from] CircularDependencyError),

    /// A schema contract was violated.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// A named node was not found.
    #[error("{0}")]
    Lookup(#[from] LookupError),

    /// A component body failed.
    #[error("Node '{node}' failed: {source}")]
    NodeExecution {
        /// The failing node.
        node: String,
        /// The underlying failure.
        #[source]
        source: anyhow::Error,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Wraps a component failure.
    pub fn node_failed(node: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::NodeExecution {
            node: node.into(),
            source: source.into(),
        }
    }

    /// Returns the contract error info for structured variants.
    #[must_use]
    pub fn error_info(&self) -> Option<&ContractErrorInfo> {
        match self {
            Self::Configuration(e) => Some(&e.error_info),
            Self::CircularDependency(e) => Some(&e.error_info),
            Self::Validation(e) => Some(&e.error_info),
            Self::Lookup(e) => Some(&e.error_info),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Metadata about an error for better diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ContractErrorInfo {
    /// Error code (e.g., "PIPELINE-CYCLE").
    pub code: String,
    /// Short summary of the error.
    pub summary: String,
    /// Hint for fixing the error.
    pub fix_hint: Option<String>,
    /// Additional context key-value pairs.
    #[serde(default)]
    pub context: HashMap<String, String>,
}

impl ContractErrorInfo {
    /// Creates a new contract error info.
    #[must_use]
    pub fn new(code: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            summary: summary.into(),
            fix_hint: None,
            context: HashMap::new(),
        }
    }

    /// Sets the fix hint.
    #[must_use]
    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }

    /// Adds a single context entry.
    #[must_use]
    pub fn with_context_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Converts to a JSON object.
    #[must_use]
    pub fn to_dict(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert("code".to_string(), serde_json::json!(self.code));
        map.insert("summary".to_string(), serde_json::json!(self.summary));
        if let Some(ref hint) = self.fix_hint {
            map.insert("fix_hint".to_string(), serde_json::json!(hint));
        }
        if !self.context.is_empty() {
            map.insert("context".to_string(), serde_json::json!(self.context));
        }
        serde_json::Value::Object(map)
    }
}

/// Error raised for an invalid pipeline configuration.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ConfigurationError {
    /// The error message.
    pub message: String,
    /// Diagnostic info.
    pub error_info: ContractErrorInfo,
}

impl ConfigurationError {
    /// Creates a configuration error with the given code.
    #[must_use]
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            error_info: ContractErrorInfo::new(code, message.clone()),
            message,
        }
    }

    /// Adds a context entry to the diagnostic info.
    #[must_use]
    pub fn with_context_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.error_info = self.error_info.with_context_entry(key, value);
        self
    }

    /// The position string is not one of the known values.
    #[must_use]
    pub fn unknown_position(value: &str) -> Self {
        let mut err = Self::new(
            "CONFIG-UNKNOWN_POSITION",
            format!("Invalid position '{value}'. Must be 'first', 'last', 'default', 'after', or 'before'"),
        );
        err.error_info = err.error_info.with_context_entry("position", value);
        err
    }

    /// `after`/`before` insertion without a usable reference.
    #[must_use]
    pub fn missing_reference(position: &str, reference: Option<&str>) -> Self {
        let message = match reference {
            Some(r) => format!("Reference node '{r}' not found for position '{position}'"),
            None => format!("Position '{position}' requires a reference node name"),
        };
        let mut err = Self::new("CONFIG-MISSING_REFERENCE", message);
        err.error_info = err
            .error_info
            .with_fix_hint("Add the reference node first, or check the reference name for typos.");
        err
    }

    /// A node with this name already exists.
    #[must_use]
    pub fn duplicate_name(name: &str) -> Self {
        let mut err = Self::new(
            "CONFIG-DUPLICATE_NAME",
            format!("A node named '{name}' already exists in the pipeline"),
        );
        err.error_info = err
            .error_info
            .with_fix_hint("Give the node a unique name, or use replace() to swap its component.");
        err
    }

    /// A dependency names a node that is not in the pipeline.
    #[must_use]
    pub fn missing_dependency(node: &str, dependency: &str) -> Self {
        let mut err = Self::new(
            "CONFIG-MISSING_DEP",
            format!("Node '{node}' depends on unknown node '{dependency}'"),
        );
        err.error_info = err
            .error_info
            .with_context_entry("node", node)
            .with_context_entry("dependency", dependency)
            .with_fix_hint("Ensure all dependencies reference nodes that exist in the pipeline.");
        err
    }
}

/// Error raised when no node can be resolved in a full pass.
#[derive(Debug, Clone, Error)]
pub struct CircularDependencyError {
    /// Nodes left unresolved.
    pub unresolved: Vec<String>,
    /// A concrete cycle among the unresolved nodes, if one was traced.
    pub cycle_path: Vec<String>,
    /// Diagnostic info.
    pub error_info: ContractErrorInfo,
}

impl CircularDependencyError {
    /// Creates a new circular dependency error.
    #[must_use]
    pub fn new(unresolved: Vec<String>, cycle_path: Vec<String>) -> Self {
        let info = ContractErrorInfo::new(
            "PIPELINE-CYCLE",
            format!("Circular dependency among nodes: {}", unresolved.join(", ")),
        )
        .with_fix_hint("Remove one of the dependencies in the cycle to break it.");

        Self {
            unresolved,
            cycle_path,
            error_info: info,
        }
    }
}

impl fmt::Display for CircularDependencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cycle_path.is_empty() {
            write!(
                f,
                "Circular dependency detected among nodes: {}",
                self.unresolved.join(", ")
            )
        } else {
            write!(f, "Circular dependency detected: {}", self.cycle_path.join(" -> "))
        }
    }
}

/// Which side of a component a schema guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaSide {
    /// Checked before the component runs.
    Input,
    /// Checked on the component's result.
    Output,
}

impl fmt::Display for SchemaSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

/// Error raised when a payload violates a schema.
#[derive(Debug, Clone, Error)]
pub struct ValidationError {
    /// The schema that rejected the payload.
    pub schema: String,
    /// Input or output.
    pub side: SchemaSide,
    /// Field that caused the error, if applicable.
    pub field: Option<String>,
    /// Error message.
    pub message: String,
    /// Diagnostic info.
    pub error_info: ContractErrorInfo,
}

impl ValidationError {
    /// Creates a new validation error.
    #[must_use]
    pub fn new(schema: impl Into<String>, side: SchemaSide, message: impl Into<String>) -> Self {
        let schema = schema.into();
        let message = message.into();
        let code = match side {
            SchemaSide::Input => "VALIDATION-INPUT",
            SchemaSide::Output => "VALIDATION-OUTPUT",
        };
        Self {
            error_info: ContractErrorInfo::new(code, message.clone())
                .with_context_entry("schema", schema.clone()),
            schema,
            side,
            field: None,
            message,
        }
    }

    /// Attaches the offending field.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        self.error_info = self.error_info.with_context_entry("field", field.clone());
        self.field = Some(field);
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation failed for schema '{}'", self.side, self.schema)?;
        if let Some(ref field) = self.field {
            write!(f, " (field '{field}')")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Error raised when a named node does not exist.
#[derive(Debug, Clone, Error)]
#[error("Node '{name}' not found in pipeline")]
pub struct LookupError {
    /// The missing node name.
    pub name: String,
    /// Diagnostic info.
    pub error_info: ContractErrorInfo,
}

impl LookupError {
    /// Creates a new lookup error.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            error_info: ContractErrorInfo::new(
                "LOOKUP-NOT_FOUND",
                format!("No node named '{name}'"),
            ),
            name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_error_info_creation() {
        let info = ContractErrorInfo::new("TEST-001", "Test error")
            .with_fix_hint("Fix this by doing that")
            .with_context_entry("node", "my_node");

        assert_eq!(info.code, "TEST-001");
        assert_eq!(info.fix_hint, Some("Fix this by doing that".to_string()));
        assert_eq!(info.context.get("node"), Some(&"my_node".to_string()));
        assert_eq!(info.to_dict()["context"]["node"], "my_node");
    }

    #[test]
    fn test_circular_dependency_display() {
        let err = CircularDependencyError::new(
            vec!["a".to_string(), "b".to_string()],
            vec!["a".to_string(), "b".to_string(), "a".to_string()],
        );
        assert_eq!(err.to_string(), "Circular dependency detected: a -> b -> a");
        assert_eq!(err.error_info.code, "PIPELINE-CYCLE");

        let err = CircularDependencyError::new(vec!["x".to_string()], Vec::new());
        assert!(err.to_string().contains("among nodes: x"));
    }

    #[test]
    fn test_validation_error_codes() {
        let err = ValidationError::new("PositiveX", SchemaSide::Input, "must be > 0").with_field("x");
        assert_eq!(err.error_info.code, "VALIDATION-INPUT");
        assert_eq!(
            err.to_string(),
            "input validation failed for schema 'PositiveX' (field 'x'): must be > 0"
        );

        let err = ValidationError::new("Out", SchemaSide::Output, "bad");
        assert_eq!(err.error_info.code, "VALIDATION-OUTPUT");
    }

    #[test]
    fn test_pipeline_error_info_passthrough() {
        let err: PipelineError = LookupError::new("ghost").into();
        assert_eq!(err.error_info().unwrap().code, "LOOKUP-NOT_FOUND");
        assert_eq!(err.to_string(), "Node 'ghost' not found in pipeline");

        let err = PipelineError::node_failed("n", anyhow::anyhow!("boom"));
        assert!(err.error_info().is_none());
        assert_eq!(err.to_string(), "Node 'n' failed: boom");
    }

    #[test]
    fn test_configuration_error_constructors() {
        assert_eq!(
            ConfigurationError::unknown_position("middle").error_info.code,
            "CONFIG-UNKNOWN_POSITION"
        );
        assert!(ConfigurationError::missing_reference("after", Some("x"))
            .message
            .contains("'x' not found"));
        assert!(ConfigurationError::missing_reference("before", None)
            .message
            .contains("requires a reference"));
        assert_eq!(
            ConfigurationError::missing_dependency("b", "a").error_info.context.get("dependency"),
            Some(&"a".to_string())
        );
    }
}
