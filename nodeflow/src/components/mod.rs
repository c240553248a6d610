//! Component trait and implementations.
//!
//! Components are the units of work a pipeline node runs. Bare functions and
//! closures are adapted into the same trait with [`FnComponent`].

#[cfg(feature = "text")]
pub mod text;

use crate::core::Container;
use crate::errors::Result;
use std::fmt::Debug;

/// Trait for pipeline components.
///
/// A component receives the container by value and returns it (or a new
/// one) for the next node.
pub trait Component<T>: Send + Sync + Debug {
    /// Returns the name of the component.
    ///
    /// Used as the node name when none is given at insertion time.
    fn name(&self) -> &str;

    /// Processes the container.
    fn process(&self, data: Container<T>) -> Result<Container<T>>;
}

/// A function-based component.
pub struct FnComponent<F> {
    name: String,
    func: F,
}

impl<F> FnComponent<F> {
    /// Creates a new function-based component.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Debug for FnComponent<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnComponent")
            .field("name", &self.name)
            .finish()
    }
}

impl<T, F> Component<T> for FnComponent<F>
where
    F: Fn(Container<T>) -> Result<Container<T>> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, data: Container<T>) -> Result<Container<T>> {
        (self.func)(data)
    }
}

/// Adapts an infallible payload transformation into a component.
pub fn map_fn<T, G>(
    name: impl Into<String>,
    func: G,
) -> FnComponent<impl Fn(Container<T>) -> Result<Container<T>> + Send + Sync>
where
    G: Fn(T) -> T + Send + Sync,
{
    FnComponent::new(name, move |data: Container<T>| Ok(data.map(&func)))
}

/// A component that returns its input unchanged.
#[derive(Debug, Clone)]
pub struct NoOpComponent {
    name: String,
}

impl NoOpComponent {
    /// Creates a new no-op component.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl<T> Component<T> for NoOpComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, data: Container<T>) -> Result<Container<T>> {
        Ok(data)
    }
}
