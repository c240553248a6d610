//! Compiles a node graph into a single executable pipeline.

use super::connectors::{InputConnector, OutputConnector};
use super::{resolve_execution_order, NodeGraph};
use crate::components::Component;
use crate::core::Container;
use crate::errors::Result;
use crate::observability::SpanTimer;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, info_span};
use uuid::Uuid;

/// One resolved step of a compiled pipeline.
struct Step<T> {
    name: String,
    runner: Arc<dyn Component<T>>,
}

/// The composed form of a pipeline: input connector, resolved nodes folded
/// left to right, output connector.
pub struct CompiledPipeline<T, In, Out> {
    name: String,
    steps: Vec<Step<T>>,
    input: Arc<dyn InputConnector<In, T>>,
    output: Arc<dyn OutputConnector<T, Out>>,
    fingerprint: String,
    built_at: DateTime<Utc>,
}

impl<T, In, Out> CompiledPipeline<T, In, Out> {
    /// Compiles `graph` with the given connectors.
    ///
    /// # Errors
    ///
    /// Propagates dependency resolution errors.
    pub fn compile(
        name: &str,
        graph: &NodeGraph<T>,
        input: Arc<dyn InputConnector<In, T>>,
        output: Arc<dyn OutputConnector<T, Out>>,
    ) -> Result<Self> {
        let nodes = graph.nodes();
        let order = resolve_execution_order(nodes)?;

        let fingerprint = fingerprint(
            order
                .iter()
                .map(|&i| (nodes[i].name.as_str(), nodes[i].dependencies.as_slice())),
        );

        let steps: Vec<Step<T>> = order
            .into_iter()
            .map(|i| Step {
                name: nodes[i].name.clone(),
                runner: Arc::clone(nodes[i].runner()),
            })
            .collect();

        info!(
            pipeline = name,
            nodes = steps.len(),
            fingerprint = %fingerprint,
            "Compiled pipeline"
        );

        Ok(Self {
            name: name.to_string(),
            steps,
            input,
            output,
            fingerprint,
            built_at: Utc::now(),
        })
    }

    /// Runs the pipeline on `raw`.
    ///
    /// The first failing node aborts the run; effects of earlier nodes are
    /// not undone.
    ///
    /// # Errors
    ///
    /// Propagates connector and node errors unchanged.
    pub fn run(&self, raw: In) -> Result<Out> {
        let run_id = Uuid::new_v4();
        let span = info_span!("pipeline.run", pipeline = %self.name, %run_id);
        let _guard = span.enter();
        let timer = SpanTimer::start(&self.name);

        let data = self.input.input(raw)?;
        let data = self.fold(data)?;
        let result = self.output.output(data)?;

        debug!(duration_ms = timer.finish(), "Pipeline run completed");
        Ok(result)
    }

    fn fold(&self, data: Container<T>) -> Result<Container<T>> {
        self.steps.iter().try_fold(data, |data, step| {
            let timer = SpanTimer::start(&step.name);
            let result = step.runner.process(data);
            debug!(
                node = %step.name,
                ok = result.is_ok(),
                duration_ms = timer.finish(),
                "Node executed"
            );
            result
        })
    }

    /// Returns the pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the node names in execution order.
    #[must_use]
    pub fn execution_order(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }

    /// Returns the number of compiled steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the pipeline has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Hash of the execution order and dependencies.
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// When the pipeline was compiled.
    #[must_use]
    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }
}

impl<T, In, Out> fmt::Debug for CompiledPipeline<T, In, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledPipeline")
            .field("name", &self.name)
            .field("execution_order", &self.execution_order())
            .field("fingerprint", &self.fingerprint)
            .field("built_at", &self.built_at)
            .finish()
    }
}

fn fingerprint<'a>(steps: impl Iterator<Item = (&'a str, &'a [String])>) -> String {
    let mut hasher = Sha256::new();
    for (name, deps) in steps {
        hasher.update(name.as_bytes());
        hasher.update([0u8]);
        for dep in deps {
            hasher.update(dep.as_bytes());
            hasher.update([1u8]);
        }
        hasher.update([2u8]);
    }
    let result = hasher.finalize();
    hex::encode(&result[..16])
}
