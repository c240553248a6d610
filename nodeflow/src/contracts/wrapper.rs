//! Validation wrapper enforcing schemas around a component.

use super::Schema;
use crate::components::Component;
use crate::core::Container;
use crate::errors::{Result, SchemaSide, ValidationError};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Input/output schemas attached to a node.
pub struct SchemaPair<T> {
    /// Checked before the component runs.
    pub input: Option<Arc<dyn Schema<T>>>,
    /// Checked on the component's result.
    pub output: Option<Arc<dyn Schema<T>>>,
}

impl<T> SchemaPair<T> {
    /// Returns true if neither side has a schema.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.input.is_none() && self.output.is_none()
    }
}

impl<T> Default for SchemaPair<T> {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
        }
    }
}

impl<T> Clone for SchemaPair<T> {
    fn clone(&self) -> Self {
        Self {
            input: self.input.clone(),
            output: self.output.clone(),
        }
    }
}

impl<T> fmt::Debug for SchemaPair<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaPair")
            .field("input", &self.input.as_ref().map(|s| s.name().to_string()))
            .field("output", &self.output.as_ref().map(|s| s.name().to_string()))
            .finish()
    }
}

/// Wraps a component with input and output schema checks.
///
/// On an input violation the inner component is never invoked.
pub struct ValidatedComponent<T> {
    inner: Arc<dyn Component<T>>,
    schemas: SchemaPair<T>,
}

impl<T: 'static> ValidatedComponent<T> {
    /// Wraps `inner`.
    #[must_use]
    pub fn new(inner: Arc<dyn Component<T>>, schemas: SchemaPair<T>) -> Self {
        Self { inner, schemas }
    }

    /// Wraps `inner` only if there is something to check.
    #[must_use]
    pub fn wrap(inner: Arc<dyn Component<T>>, schemas: &SchemaPair<T>) -> Arc<dyn Component<T>> {
        if schemas.is_empty() {
            inner
        } else {
            Arc::new(Self::new(inner, schemas.clone()))
        }
    }

    /// Returns the wrapped component.
    #[must_use]
    pub fn inner(&self) -> &Arc<dyn Component<T>> {
        &self.inner
    }

    fn check(
        &self,
        schema: Option<&Arc<dyn Schema<T>>>,
        side: SchemaSide,
        payload: &T,
    ) -> Result<(), ValidationError> {
        let Some(schema) = schema else {
            return Ok(());
        };
        schema.validate(payload).map_err(|violation| {
            debug!(
                component = self.inner.name(),
                schema = schema.name(),
                %side,
                "Schema rejected payload"
            );
            let err = ValidationError::new(schema.name(), side, violation.message);
            match violation.field {
                Some(field) => err.with_field(field),
                None => err,
            }
        })
    }
}

impl<T> fmt::Debug for ValidatedComponent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedComponent")
            .field("inner", &self.inner)
            .field("schemas", &self.schemas)
            .finish()
    }
}

impl<T: 'static> Component<T> for ValidatedComponent<T> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn process(&self, data: Container<T>) -> Result<Container<T>> {
        self.check(self.schemas.input.as_ref(), SchemaSide::Input, &data.payload)?;
        let result = self.inner.process(data)?;
        self.check(self.schemas.output.as_ref(), SchemaSide::Output, &result.payload)?;
        Ok(result)
    }
}
