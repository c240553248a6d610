//! The generic value holder threaded through a pipeline.

use serde::{Deserialize, Serialize};

/// Carries a payload through every node of a pipeline.
///
/// Nodes take the container by value and hand it back, so the payload moves
/// through the fold without being copied between steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container<T> {
    /// The wrapped value.
    pub payload: T,
}

impl<T> Container<T> {
    /// Wraps a payload.
    #[must_use]
    pub fn new(payload: T) -> Self {
        Self { payload }
    }

    /// Returns the payload, consuming the container.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.payload
    }

    /// Applies `f` to the payload.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Container<U> {
        Container::new(f(self.payload))
    }
}

impl<T> From<T> for Container<T> {
    fn from(payload: T) -> Self {
        Self::new(payload)
    }
}
