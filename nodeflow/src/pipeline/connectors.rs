//! Input and output connectors around the node fold.
//!
//! An input connector turns a raw value into the container the first node
//! receives; an output connector turns the last container into the value the
//! caller gets back. Without explicit connectors the pipeline wraps raw
//! payloads with `Into<Container<T>>` and returns the container itself.

use crate::core::Container;
use crate::errors::Result;
use std::marker::PhantomData;

/// Converts raw input into a container. Invoked once per execution.
pub trait InputConnector<In, T>: Send + Sync {
    /// Produces the container fed to the first node.
    fn input(&self, raw: In) -> Result<Container<T>>;
}

/// Converts the final container into the pipeline result. Invoked once per
/// execution.
pub trait OutputConnector<T, Out>: Send + Sync {
    /// Produces the value returned to the caller.
    fn output(&self, data: Container<T>) -> Result<Out>;
}

/// Wraps raw payloads in a default container.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultInput;

impl<In, T> InputConnector<In, T> for DefaultInput
where
    In: Into<Container<T>>,
{
    fn input(&self, raw: In) -> Result<Container<T>> {
        Ok(raw.into())
    }
}

/// Returns the final container unchanged (or converted via `From`).
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultOutput;

impl<T, Out> OutputConnector<T, Out> for DefaultOutput
where
    Out: From<Container<T>>,
{
    fn output(&self, data: Container<T>) -> Result<Out> {
        Ok(Out::from(data))
    }
}

/// A closure-based input connector.
pub struct FnInput<F, In> {
    func: F,
    _marker: PhantomData<fn(In)>,
}

impl<F, In> FnInput<F, In> {
    /// Creates a new closure-based input connector.
    pub fn new(func: F) -> Self {
        Self {
            func,
            _marker: PhantomData,
        }
    }
}

impl<F, In, T> InputConnector<In, T> for FnInput<F, In>
where
    F: Fn(In) -> Result<Container<T>> + Send + Sync,
{
    fn input(&self, raw: In) -> Result<Container<T>> {
        (self.func)(raw)
    }
}

/// A closure-based output connector.
pub struct FnOutput<F, Out> {
    func: F,
    _marker: PhantomData<fn() -> Out>,
}

impl<F, Out> FnOutput<F, Out> {
    /// Creates a new closure-based output connector.
    pub fn new(func: F) -> Self {
        Self {
            func,
            _marker: PhantomData,
        }
    }
}

impl<F, T, Out> OutputConnector<T, Out> for FnOutput<F, Out>
where
    F: Fn(Container<T>) -> Result<Out> + Send + Sync,
{
    fn output(&self, data: Container<T>) -> Result<Out> {
        (self.func)(data)
    }
}
