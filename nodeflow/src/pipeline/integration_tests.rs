//! End-to-end tests through the pipeline facade.

#[cfg(test)]
mod tests {
    use crate::components::{map_fn, Component, FnComponent, NoOpComponent};
    use crate::contracts::{FieldViolation, ModelSchema, Validate};
    use crate::core::{Container, Document, PipelineState, Position};
    use crate::errors::{PipelineError, Result, SchemaSide};
    use crate::pipeline::{ComponentRegistry, NodeConfig, NodeOptions, Pipeline, PipelineConfig};
    use crate::testing::{CountingComponent, FailingComponent, RecordingComponent};
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Debug, Deserialize)]
    struct Measurement {
        x: i64,
    }

    impl Validate for Measurement {
        fn validate(&self) -> Result<(), FieldViolation> {
            if self.x > 0 {
                Ok(())
            } else {
                Err(FieldViolation::for_field("x", "must be greater than 0"))
            }
        }
    }

    fn noop(name: &str) -> Arc<dyn Component<i32>> {
        Arc::new(NoOpComponent::new(name))
    }

    fn pipeline_of(names: &[&str]) -> Pipeline<i32> {
        let mut pipeline = Pipeline::new("test");
        for name in names {
            pipeline.append(noop(name)).unwrap();
        }
        pipeline
    }

    #[test]
    fn test_double_then_increment() {
        let mut pipeline: Pipeline<i32> = Pipeline::new("math");
        pipeline.append(Arc::new(map_fn("double", |x: i32| x * 2))).unwrap();
        pipeline.append(Arc::new(map_fn("increment", |x: i32| x + 1))).unwrap();

        assert_eq!(pipeline.invoke(Container::new(3)).unwrap(), Container::new(7));
        assert_eq!(pipeline.invoke(3).unwrap().payload, 7);
    }

    #[cfg(feature = "text")]
    #[test]
    fn test_text_preprocessing() {
        let config = PipelineConfig::from_json_str(
            r#"{
                "name": "preprocess",
                "nodes": [
                    {"component": "lowercase", "stage": "preprocessing"},
                    {"component": "strip_punctuation", "stage": "preprocessing"},
                    {"component": "tokenize", "stage": "tokenization"}
                ]
            }"#,
        )
        .unwrap();
        let registry = ComponentRegistry::with_text_components();
        let mut pipeline: Pipeline<Document> = Pipeline::from_config(&config, &registry).unwrap();

        let out = pipeline.invoke(Document::from("Hello, World!")).unwrap();
        assert_eq!(out.payload.tokens, vec!["hello", "world"]);
        assert_eq!(
            pipeline.to_string(),
            "preprocessing:\n  - lowercase\n  - strip_punctuation\ntokenization:\n  - tokenize\n"
        );
    }

    #[test]
    fn test_positional_insertion_indexes() {
        let mut pipeline = pipeline_of(&["a", "b"]);

        pipeline
            .add_node(noop("first"), NodeOptions::new().first())
            .unwrap();
        pipeline.add_node(noop("last"), NodeOptions::new().last()).unwrap();
        pipeline
            .add_node(noop("after_a"), NodeOptions::new().after("a"))
            .unwrap();
        pipeline
            .add_node(noop("before_b"), NodeOptions::new().before("b"))
            .unwrap();
        pipeline
            .add_node(
                noop("typed"),
                NodeOptions::new()
                    .position("before".parse::<Position>().unwrap())
                    .reference("first"),
            )
            .unwrap();

        assert_eq!(
            pipeline.node_names(),
            vec!["typed", "first", "a", "after_a", "before_b", "b", "last"]
        );
    }

    #[test]
    fn test_relative_position_without_reference() {
        let mut pipeline = pipeline_of(&["a"]);
        for options in [NodeOptions::new().after("ghost"), NodeOptions::new().before("ghost")] {
            assert!(matches!(
                pipeline.add_node(noop("x"), options),
                Err(PipelineError::Configuration(_))
            ));
        }
        assert!("middle".parse::<Position>().is_err());
        assert_eq!(pipeline.len(), 1);
    }

    #[test]
    fn test_dependency_chain_any_insertion_order() {
        let log = RecordingComponent::log();
        let specs: [(&str, &[&str]); 3] = [("A", &[]), ("B", &["A"]), ("C", &["B"])];

        for order in [[2, 1, 0], [1, 2, 0], [0, 2, 1]] {
            log.lock().clear();
            let mut pipeline: Pipeline<i32> = Pipeline::new("deps");
            for i in order {
                let (name, deps) = specs[i];
                pipeline
                    .add_node(
                        Arc::new(RecordingComponent::new(name, Arc::clone(&log))),
                        NodeOptions::new().depends_on(deps.iter().copied()),
                    )
                    .unwrap();
            }

            assert_eq!(pipeline.execution_order().unwrap(), vec!["A", "B", "C"]);
            pipeline.invoke(0).unwrap();
            assert_eq!(*log.lock(), vec!["A", "B", "C"]);
        }
    }

    #[test]
    fn test_mutual_dependency_fails_build() {
        let mut pipeline: Pipeline<i32> = Pipeline::new("cycle");
        pipeline
            .add_node(noop("A"), NodeOptions::new().depends_on(["B"]))
            .unwrap();
        pipeline
            .add_node(noop("B"), NodeOptions::new().depends_on(["A"]))
            .unwrap();

        match pipeline.build() {
            Err(PipelineError::CircularDependency(e)) => {
                assert_eq!(e.unresolved, vec!["A", "B"]);
                assert_eq!(e.error_info.code, "PIPELINE-CYCLE");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_remove() {
        let mut pipeline = pipeline_of(&["a", "b", "c"]);
        pipeline.build().unwrap();

        assert!(matches!(pipeline.remove("zzz"), Err(PipelineError::Lookup(_))));
        assert_eq!(pipeline.len(), 3);

        pipeline.remove("b").unwrap();
        assert_eq!(pipeline.len(), 2);
        assert_eq!(pipeline.state(), PipelineState::Configured);

        let compiled = pipeline.build().unwrap();
        assert_eq!(compiled.execution_order(), vec!["a", "c"]);
    }

    #[test]
    fn test_replace_preserves_metadata_and_changes_behavior() {
        let mut pipeline: Pipeline<i32> = Pipeline::new("replace");
        pipeline.append(Arc::new(map_fn("load", |x: i32| x))).unwrap();
        pipeline
            .add_node(
                Arc::new(map_fn("score", |x: i32| x + 1)),
                NodeOptions::new().stage("model").depends_on(["load"]),
            )
            .unwrap();
        pipeline.append(Arc::new(map_fn("report", |x: i32| x * 10))).unwrap();
        assert_eq!(pipeline.invoke(1).unwrap().payload, 20);

        pipeline
            .replace("score", Arc::new(map_fn("score_v2", |x: i32| x + 5)))
            .unwrap();

        let node = pipeline.node("score").unwrap();
        assert_eq!(node.component.name(), "score_v2");
        assert_eq!(node.stage.as_deref(), Some("model"));
        assert_eq!(node.dependencies, vec!["load"]);
        assert_eq!(pipeline.node_names(), vec!["load", "score", "report"]);
        assert_eq!(pipeline.stages().get("model").unwrap(), &["score".to_string()]);

        assert_eq!(pipeline.invoke(1).unwrap().payload, 60);
        assert!(matches!(
            pipeline.replace("missing", noop("x")),
            Err(PipelineError::Lookup(_))
        ));
    }

    #[test]
    fn test_input_schema_blocks_component() {
        let spy = Arc::new(CountingComponent::new("spy"));
        let mut pipeline: Pipeline<serde_json::Value> = Pipeline::new("validated");
        pipeline
            .add_node(
                spy.clone(),
                NodeOptions::new().input_schema(Arc::new(ModelSchema::<Measurement>::new())),
            )
            .unwrap();

        let err = pipeline.invoke(json!({"x": -1})).unwrap_err();
        match err {
            PipelineError::Validation(e) => {
                assert_eq!(e.schema, "Measurement");
                assert_eq!(e.side, SchemaSide::Input);
                assert_eq!(e.field.as_deref(), Some("x"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(spy.call_count(), 0);

        pipeline.invoke(json!({"x": 4})).unwrap();
        assert_eq!(spy.call_count(), 1);
    }

    #[test]
    fn test_replace_keeps_schemas() {
        let mut pipeline: Pipeline<serde_json::Value> = Pipeline::new("validated");
        pipeline
            .add_node(
                Arc::new(NoOpComponent::new("check")),
                NodeOptions::new().output_schema(Arc::new(ModelSchema::<Measurement>::new())),
            )
            .unwrap();

        let negate = FnComponent::new("negate", |c: Container<serde_json::Value>| -> Result<_> {
            let x = c.payload["x"].as_i64().unwrap_or_default();
            Ok(Container::new(json!({ "x": -x })))
        });
        pipeline.replace("check", Arc::new(negate)).unwrap();

        assert!(pipeline.node("check").unwrap().is_validated());
        assert!(matches!(
            pipeline.invoke(json!({"x": 3})),
            Err(PipelineError::Validation(_))
        ));
    }

    #[test]
    fn test_mutation_invalidates_cache() {
        let mut pipeline: Pipeline<i32> = Pipeline::new("cache");
        pipeline.append(Arc::new(map_fn("double", |x: i32| x * 2))).unwrap();
        assert_eq!(pipeline.invoke(2).unwrap().payload, 4);
        let fingerprint = pipeline.compiled().unwrap().fingerprint().to_string();

        pipeline.append(Arc::new(map_fn("increment", |x: i32| x + 1))).unwrap();
        assert!(!pipeline.is_built());
        assert_eq!(pipeline.invoke(2).unwrap().payload, 5);
        assert_ne!(pipeline.compiled().unwrap().fingerprint(), fingerprint);

        pipeline.remove("double").unwrap();
        assert_eq!(pipeline.invoke(2).unwrap().payload, 3);

        pipeline
            .replace("increment", Arc::new(map_fn("decrement", |x: i32| x - 1)))
            .unwrap();
        assert_eq!(pipeline.invoke(2).unwrap().payload, 1);
    }

    #[test]
    fn test_node_failure_propagates() {
        let log = RecordingComponent::log();
        let mut pipeline: Pipeline<i32> = Pipeline::new("failing");
        pipeline
            .append(Arc::new(RecordingComponent::new("before", Arc::clone(&log))))
            .unwrap();
        pipeline
            .append(Arc::new(FailingComponent::new("explode", "kaboom")))
            .unwrap();
        pipeline
            .append(Arc::new(RecordingComponent::new("after", Arc::clone(&log))))
            .unwrap();

        match pipeline.invoke(1) {
            Err(PipelineError::NodeExecution { node, source }) => {
                assert_eq!(node, "explode");
                assert_eq!(source.to_string(), "kaboom");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(*log.lock(), vec!["before"]);
    }

    #[cfg(feature = "text")]
    #[test]
    fn test_config_with_unknown_component() {
        let config = PipelineConfig {
            name: "bad".to_string(),
            nodes: vec![NodeConfig::new("lowercase"), NodeConfig::new("stem")],
        };
        let registry = ComponentRegistry::with_text_components();

        let result: Result<Pipeline<Document>> = Pipeline::from_config(&config, &registry);
        assert!(matches!(result, Err(PipelineError::Configuration(_))));
    }

    #[test]
    fn test_compiled_pipeline_shared_across_threads() {
        let mut pipeline: Pipeline<i32> = Pipeline::new("shared");
        pipeline.append(Arc::new(map_fn("square", |x: i32| x * x))).unwrap();
        let compiled = pipeline.build().unwrap();

        let handles: Vec<_> = (1..=4)
            .map(|i| {
                let compiled = Arc::clone(&compiled);
                std::thread::spawn(move || compiled.run(Container::new(i)).unwrap().payload)
            })
            .collect();
        let results: Vec<i32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, vec![1, 4, 9, 16]);
    }
}
