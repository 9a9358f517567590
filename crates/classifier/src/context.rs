//! Everything inference needs, loaded once and shared read-only.

use std::sync::Arc;

use yogapose_common::config::AppConfig;
use yogapose_common::error::{PoseError, PoseResult};
use yogapose_pose_model::ClassLabelSet;
use yogapose_processing_core::SequenceNormalizer;

use crate::model::{OnnxSequenceClassifier, SequenceClassifier};

/// Classifier, label set and normalizer settings.
///
/// Immutable after construction and cheap to clone, so concurrent requests
/// can each hold one. A context without a model or labels is still valid;
/// every prediction through it fails with a configuration error.
#[derive(Clone)]
pub struct InferenceContext {
    model: Option<Arc<dyn SequenceClassifier>>,
    labels: Option<ClassLabelSet>,
    normalizer: SequenceNormalizer,
}

impl InferenceContext {
    /// Pair a model with its labels, checking the output width matches.
    pub fn new(
        model: Arc<dyn SequenceClassifier>,
        labels: ClassLabelSet,
        normalizer: SequenceNormalizer,
    ) -> PoseResult<Self> {
        if let Some(n) = model.num_classes() {
            if n != labels.len() {
                return Err(PoseError::configuration(format!(
                    "classifier has {n} outputs but {} labels are loaded",
                    labels.len()
                )));
            }
        }
        Ok(Self {
            model: Some(model),
            labels: Some(labels),
            normalizer,
        })
    }

    /// A context with nothing loaded.
    pub fn unloaded(normalizer: SequenceNormalizer) -> Self {
        Self {
            model: None,
            labels: None,
            normalizer,
        }
    }

    /// Load labels and the ONNX classifier named by `config`.
    ///
    /// Load failures are logged and leave the corresponding part empty, so a
    /// process can still start and report its state; predictions will fail.
    pub fn load(config: &AppConfig) -> Self {
        let normalizer = SequenceNormalizer::new(config.pipeline.standardization);

        let labels = match ClassLabelSet::load(&config.model.labels_path, &config.model.labels_csv) {
            Ok(labels) => Some(labels),
            Err(e) => {
                tracing::error!("Failed to load class labels: {}", e);
                None
            }
        };

        let model = match OnnxSequenceClassifier::load(&config.model) {
            Ok(model) => Some(Arc::new(model) as Arc<dyn SequenceClassifier>),
            Err(e) => {
                tracing::error!("Failed to load classifier: {}", e);
                None
            }
        };

        match (model, labels) {
            (Some(model), Some(labels)) => {
                Self::new(model, labels, normalizer).unwrap_or_else(|e| {
                    tracing::error!("{}", e);
                    Self::unloaded(normalizer)
                })
            }
            (model, labels) => Self {
                model,
                labels,
                normalizer,
            },
        }
    }

    /// Both the classifier and its labels are available.
    pub fn is_loaded(&self) -> bool {
        self.model.is_some() && self.labels.is_some()
    }

    pub fn model(&self) -> Option<&Arc<dyn SequenceClassifier>> {
        self.model.as_ref()
    }

    pub fn labels(&self) -> Option<&ClassLabelSet> {
        self.labels.as_ref()
    }

    pub fn normalizer(&self) -> &SequenceNormalizer {
        &self.normalizer
    }

    /// The error every prediction reports when the model or labels are missing.
    pub fn ensure_loaded(&self) -> PoseResult<()> {
        self.require_loaded().map(|_| ())
    }

    /// Model and labels, or the [`ensure_loaded`](Self::ensure_loaded) error.
    pub(crate) fn require_loaded(&self) -> PoseResult<(&dyn SequenceClassifier, &ClassLabelSet)> {
        match (&self.model, &self.labels) {
            (Some(model), Some(labels)) => Ok((model.as_ref(), labels)),
            _ => Err(PoseError::configuration("Model not loaded")),
        }
    }
}

impl std::fmt::Debug for InferenceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceContext")
            .field("model", &self.model.as_ref().map(|m| m.describe()))
            .field("labels", &self.labels)
            .field("normalizer", &self.normalizer)
            .finish()
    }
}
