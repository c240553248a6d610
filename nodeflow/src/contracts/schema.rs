//! Payload schemas checked around a component.

use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// A single contract violation reported by a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Field that caused the error, if applicable.
    pub field: Option<String>,
    /// Error message.
    pub message: String,
}

impl FieldViolation {
    /// Creates a violation not tied to a field.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a violation for a specific field.
    #[must_use]
    pub fn for_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref field) = self.field {
            write!(f, "Field '{}': {}", field, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

/// A shape contract on a payload.
pub trait Schema<T>: Send + Sync {
    /// Name used in error messages.
    fn name(&self) -> &str;

    /// Checks the payload.
    fn validate(&self, payload: &T) -> Result<(), FieldViolation>;
}

/// Field-level constraints for a typed model.
///
/// Models are deserialized from the payload first, so type and presence
/// checks come from serde; this hook adds value constraints on top.
pub trait Validate {
    /// Checks value constraints.
    fn validate(&self) -> Result<(), FieldViolation> {
        Ok(())
    }
}

/// A schema backed by a serde model type.
///
/// The payload is serialized to JSON and read back as `M`; a payload that
/// does not fit `M`, or fails `M::validate`, is rejected.
pub struct ModelSchema<M> {
    name: String,
    _marker: PhantomData<fn() -> M>,
}

impl<M> ModelSchema<M> {
    /// Creates a schema named after the model type.
    #[must_use]
    pub fn new() -> Self {
        let full = std::any::type_name::<M>();
        let short = full.rsplit("::").next().unwrap_or(full);
        Self::named(short)
    }

    /// Creates a schema with an explicit name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            _marker: PhantomData,
        }
    }
}

impl<M> Default for ModelSchema<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> fmt::Debug for ModelSchema<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSchema").field("name", &self.name).finish()
    }
}

impl<T, M> Schema<T> for ModelSchema<M>
where
    T: Serialize,
    M: DeserializeOwned + Validate,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, payload: &T) -> Result<(), FieldViolation> {
        let value = serde_json::to_value(payload)
            .map_err(|e| FieldViolation::new(format!("Serialization error: {e}")))?;
        let model: M = serde_json::from_value(value)
            .map_err(|e| FieldViolation::new(format!("Payload does not match model: {e}")))?;
        model.validate()
    }
}

/// A schema defined by a predicate closure.
pub struct FnSchema<F> {
    name: String,
    check: F,
}

impl<F> FnSchema<F> {
    /// Creates a new predicate schema.
    pub fn new(name: impl Into<String>, check: F) -> Self {
        Self {
            name: name.into(),
            check,
        }
    }
}

impl<F> fmt::Debug for FnSchema<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSchema").field("name", &self.name).finish()
    }
}

impl<T, F> Schema<T> for FnSchema<F>
where
    F: Fn(&T) -> Result<(), FieldViolation> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, payload: &T) -> Result<(), FieldViolation> {
        (self.check)(payload)
    }
}

/// Requires the payload to serialize to an object holding the given fields.
#[derive(Debug, Clone)]
pub struct RequiredFields {
    name: String,
    fields: Vec<String>,
}

impl RequiredFields {
    /// Creates a schema over the listed fields.
    #[must_use]
    pub fn new(fields: &[&str]) -> Self {
        Self {
            name: "RequiredFields".to_string(),
            fields: fields.iter().map(|f| (*f).to_string()).collect(),
        }
    }

    /// Sets the schema name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl<T: Serialize> Schema<T> for RequiredFields {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, payload: &T) -> Result<(), FieldViolation> {
        let value = serde_json::to_value(payload)
            .map_err(|e| FieldViolation::new(format!("Serialization error: {e}")))?;
        let object = value
            .as_object()
            .ok_or_else(|| FieldViolation::new("Payload must serialize to an object"))?;

        for field in &self.fields {
            if !object.contains_key(field) {
                return Err(FieldViolation::for_field(field, "Missing required field"));
            }
        }
        Ok(())
    }
}
