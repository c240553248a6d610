//! Pipeline definitions and the model-backed factory entry points.
//!
//! Concrete pipelines implement [`PipelineDefinition`] and register their
//! nodes and connectors in `configure_pipeline`. The factories on
//! [`Pipeline`] build the [`ModelConfig`] and hand it to that hook.

use super::Pipeline;
use crate::core::Container;
use crate::errors::{ConfigurationError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// The library a model is loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSource {
    /// spaCy pipelines.
    Spacy,
    /// Hugging Face hub models.
    HuggingFace,
    /// LangChain chains.
    Langchain,
    /// Anything else the definition knows how to load.
    Custom,
}

impl ModelSource {
    /// Returns the lowercase name of the source.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spacy => "spacy",
            Self::HuggingFace => "huggingface",
            Self::Langchain => "langchain",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelSource {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "spacy" => Ok(Self::Spacy),
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            "langchain" => Ok(Self::Langchain),
            "custom" => Ok(Self::Custom),
            _ => Err(ConfigurationError::new(
                "CONFIG-UNKNOWN_SOURCE",
                format!(
                    "Unknown model source '{s}'. Expected one of: spacy, huggingface, langchain, custom"
                ),
            )),
        }
    }
}

/// Describes the model a pipeline definition should configure itself with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Where the model comes from.
    pub source: ModelSource,
    /// Model identifier (hub id, package name or local file name).
    pub model: String,
    /// Local path, set by [`Pipeline::from_local_model`].
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Task name, e.g. `"ner"` or `"summarization"`.
    #[serde(default)]
    pub task: Option<String>,
    /// Prompt template for chain-based sources.
    #[serde(default)]
    pub template: Option<String>,
    /// Extra source-specific arguments.
    #[serde(default)]
    pub kwargs: serde_json::Map<String, serde_json::Value>,
}

impl ModelConfig {
    /// Creates a config for `model` from `source`.
    #[must_use]
    pub fn new(source: ModelSource, model: impl Into<String>) -> Self {
        Self {
            source,
            model: model.into(),
            path: None,
            task: None,
            template: None,
            kwargs: serde_json::Map::new(),
        }
    }

    /// Sets the task.
    #[must_use]
    pub fn with_task(mut self, task: impl Into<String>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Sets the template.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Adds an extra argument.
    #[must_use]
    pub fn with_kwarg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.kwargs.insert(key.into(), value.into());
        self
    }
}

/// A concrete pipeline: how to create the empty pipeline and how to fill it
/// for a given model.
pub trait PipelineDefinition<T, In = Container<T>, Out = Container<T>> {
    /// Creates the empty pipeline, with its connectors.
    fn create_pipeline(&self) -> Pipeline<T, In, Out>;

    /// Registers nodes and connectors for `config`.
    ///
    /// # Errors
    ///
    /// Implementations return configuration errors for models they cannot
    /// use, and propagate errors from the pipeline operations they call.
    fn configure_pipeline(
        &self,
        pipeline: &mut Pipeline<T, In, Out>,
        config: &ModelConfig,
    ) -> Result<()>;
}

impl<T: 'static, In, Out> Pipeline<T, In, Out> {
    /// Creates a pipeline from `definition` configured with `config`.
    ///
    /// # Errors
    ///
    /// Propagates errors from `configure_pipeline`.
    pub fn load<D>(definition: &D, config: &ModelConfig) -> Result<Self>
    where
        D: PipelineDefinition<T, In, Out> + ?Sized,
    {
        let mut pipeline = definition.create_pipeline();
        definition.configure_pipeline(&mut pipeline, config)?;
        info!(
            pipeline = %pipeline.name(),
            source = %config.source,
            model = %config.model,
            nodes = pipeline.len(),
            "Loaded pipeline"
        );
        Ok(pipeline)
    }

    /// Creates a pipeline for a model identified by `model_id`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown source, and propagates
    /// errors from `configure_pipeline`.
    pub fn from_model_id<D>(definition: &D, model_id: &str, source: &str) -> Result<Self>
    where
        D: PipelineDefinition<T, In, Out> + ?Sized,
    {
        let config = ModelConfig::new(source.parse()?, model_id);
        Self::load(definition, &config)
    }

    /// Creates a pipeline for a model stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown source or a path that
    /// does not exist, and propagates errors from `configure_pipeline`.
    pub fn from_local_model<D>(
        definition: &D,
        path: impl AsRef<Path>,
        source: &str,
    ) -> Result<Self>
    where
        D: PipelineDefinition<T, In, Out> + ?Sized,
    {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigurationError::new(
                "CONFIG-MODEL_PATH",
                format!("Model path '{}' does not exist", path.display()),
            )
            .into());
        }
        let model = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        let mut config = ModelConfig::new(source.parse()?, model);
        config.path = Some(path.to_path_buf());
        Self::load(definition, &config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::map_fn;
    use crate::errors::PipelineError;
    use crate::pipeline::NodeOptions;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct ScalePipeline {
        seen: Mutex<Vec<ModelConfig>>,
    }

    impl PipelineDefinition<i32> for ScalePipeline {
        fn create_pipeline(&self) -> Pipeline<i32> {
            Pipeline::new("scale")
        }

        fn configure_pipeline(
            &self,
            pipeline: &mut Pipeline<i32>,
            config: &ModelConfig,
        ) -> Result<()> {
            self.seen.lock().push(config.clone());
            let factor = config
                .kwargs
                .get("factor")
                .and_then(serde_json::Value::as_i64)
                .unwrap_or(2);
            let factor = i32::try_from(factor).map_err(|e| {
                ConfigurationError::new("CONFIG-INVALID_PARAM", e.to_string())
            })?;
            pipeline.add_node(
                Arc::new(map_fn("scale", move |x: i32| x * factor)),
                NodeOptions::new().stage("model"),
            )?;
            Ok(())
        }
    }

    #[test]
    fn test_model_source_parse() {
        assert_eq!("spacy".parse::<ModelSource>().unwrap(), ModelSource::Spacy);
        assert_eq!("HuggingFace".parse::<ModelSource>().unwrap(), ModelSource::HuggingFace);
        assert_eq!("langchain".parse::<ModelSource>().unwrap(), ModelSource::Langchain);

        let err = "onnx".parse::<ModelSource>().unwrap_err();
        assert_eq!(err.error_info.code, "CONFIG-UNKNOWN_SOURCE");
    }

    #[test]
    fn test_load_calls_configure_with_config() {
        let definition = ScalePipeline::default();
        let config = ModelConfig::new(ModelSource::Custom, "scaler")
            .with_task("scale")
            .with_kwarg("factor", 5);

        let mut pipeline: Pipeline<i32> = Pipeline::load(&definition, &config).unwrap();
        assert_eq!(pipeline.name(), "scale");
        assert_eq!(pipeline.invoke(3).unwrap().payload, 15);
        assert_eq!(*definition.seen.lock(), vec![config]);
    }

    #[test]
    fn test_from_model_id() {
        let definition = ScalePipeline::default();
        let mut pipeline: Pipeline<i32> =
            Pipeline::from_model_id(&definition, "en_core_sci_sm", "spacy").unwrap();
        assert_eq!(pipeline.invoke(4).unwrap().payload, 8);

        let seen = definition.seen.lock();
        assert_eq!(seen[0].source, ModelSource::Spacy);
        assert_eq!(seen[0].model, "en_core_sci_sm");
        assert!(seen[0].path.is_none());
    }

    #[test]
    fn test_from_model_id_unknown_source_skips_configure() {
        let definition = ScalePipeline::default();
        let result: Result<Pipeline<i32>> = Pipeline::from_model_id(&definition, "m", "tensorflow");
        assert!(matches!(result, Err(PipelineError::Configuration(_))));
        assert!(definition.seen.lock().is_empty());
    }

    #[test]
    fn test_from_local_model() {
        let dir = tempfile::tempdir().unwrap();
        let model_path = dir.path().join("model.bin");
        std::fs::write(&model_path, b"weights").unwrap();

        let definition = ScalePipeline::default();
        let _pipeline: Pipeline<i32> =
            Pipeline::from_local_model(&definition, &model_path, "huggingface").unwrap();

        let seen = definition.seen.lock();
        assert_eq!(seen[0].source, ModelSource::HuggingFace);
        assert_eq!(seen[0].model, "model.bin");
        assert_eq!(seen[0].path.as_deref(), Some(model_path.as_path()));
    }

    #[test]
    fn test_from_local_model_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let definition = ScalePipeline::default();
        let result: Result<Pipeline<i32>> =
            Pipeline::from_local_model(&definition, dir.path().join("absent"), "spacy");

        match result {
            Err(PipelineError::Configuration(e)) => {
                assert_eq!(e.error_info.code, "CONFIG-MODEL_PATH");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_model_config_deserialize_defaults() {
        let config: ModelConfig =
            serde_json::from_str(r#"{"source": "langchain", "model": "chain"}"#).unwrap();
        assert_eq!(config.source, ModelSource::Langchain);
        assert!(config.task.is_none());
        assert!(config.kwargs.is_empty());
    }
}
