//! Mock components for testing.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::components::Component;
use crate::core::Container;
use crate::errors::{PipelineError, Result};

/// A pass-through component that counts its invocations.
#[derive(Debug)]
pub struct CountingComponent {
    name: String,
    call_count: Mutex<usize>,
}

impl CountingComponent {
    /// Creates a new counting component.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            call_count: Mutex::new(0),
        }
    }

    /// Returns the number of times the component was called.
    #[must_use]
    pub fn call_count(&self) -> usize {
        *self.call_count.lock()
    }

    /// Resets call tracking.
    pub fn reset(&self) {
        *self.call_count.lock() = 0;
    }
}

impl<T> Component<T> for CountingComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, data: Container<T>) -> Result<Container<T>> {
        *self.call_count.lock() += 1;
        Ok(data)
    }
}

/// Shared log of component names in the order they ran.
pub type ExecutionLog = Arc<Mutex<Vec<String>>>;

/// A pass-through component that appends its name to a shared log.
#[derive(Debug)]
pub struct RecordingComponent {
    name: String,
    log: ExecutionLog,
}

impl RecordingComponent {
    /// Creates a recording component writing to `log`.
    #[must_use]
    pub fn new(name: impl Into<String>, log: ExecutionLog) -> Self {
        Self {
            name: name.into(),
            log,
        }
    }

    /// Creates an empty shared log.
    #[must_use]
    pub fn log() -> ExecutionLog {
        Arc::new(Mutex::new(Vec::new()))
    }
}

impl<T> Component<T> for RecordingComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, data: Container<T>) -> Result<Container<T>> {
        self.log.lock().push(self.name.clone());
        Ok(data)
    }
}

/// A component that always fails.
#[derive(Debug)]
pub struct FailingComponent {
    name: String,
    error: String,
}

impl FailingComponent {
    /// Creates a new failing component.
    #[must_use]
    pub fn new(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            error: error.into(),
        }
    }
}

impl<T> Component<T> for FailingComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, _data: Container<T>) -> Result<Container<T>> {
        Err(PipelineError::node_failed(
            &self.name,
            anyhow::anyhow!(self.error.clone()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counting_component() {
        let spy = CountingComponent::new("spy");
        assert_eq!(Component::<i32>::name(&spy), "spy");

        spy.process(Container::new(1)).unwrap();
        spy.process(Container::new(2)).unwrap();
        assert_eq!(spy.call_count(), 2);

        spy.reset();
        assert_eq!(spy.call_count(), 0);
    }

    #[test]
    fn test_recording_component() {
        let log = RecordingComponent::log();
        let a = RecordingComponent::new("a", log.clone());
        let b = RecordingComponent::new("b", log.clone());

        b.process(Container::new(())).unwrap();
        a.process(Container::new(())).unwrap();
        assert_eq!(*log.lock(), vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_failing_component() {
        let failing = FailingComponent::new("bad", "nope");
        let err = failing.process(Container::new(0_u8)).unwrap_err();
        assert_eq!(err.to_string(), "Node 'bad' failed: nope");
    }
}
