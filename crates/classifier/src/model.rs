//! The trained sequence classifier, as an opaque forward function.

use std::path::Path;
use std::sync::Mutex;

use ndarray::{Array2, Array3, ArrayView3};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use yogapose_common::config::ModelConfig;
use yogapose_common::error::{PoseError, PoseResult};
use yogapose_pose_model::{FIXED_FRAMES, NUM_CHANNELS};

/// Maps a `(batch, 99, 30)` input to `(batch, classes)` logits.
pub trait SequenceClassifier: Send + Sync {
    fn forward(&self, input: ArrayView3<'_, f32>) -> PoseResult<Array2<f32>>;

    /// Output width, when the model knows it ahead of a call.
    fn num_classes(&self) -> Option<usize>;

    /// Human-readable description for logs and health output.
    fn describe(&self) -> String;
}

/// ONNX export of the CNN + BiGRU classifier.
pub struct OnnxSequenceClassifier {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
    num_classes: usize,
    source: String,
}

impl OnnxSequenceClassifier {
    pub fn load(config: &ModelConfig) -> PoseResult<Self> {
        let path = &config.model_path;
        if !path.exists() {
            return Err(PoseError::configuration(format!(
                "classifier model not found at {}",
                path.display()
            )));
        }

        let session = build_session(path, config.intra_threads).map_err(|e| {
            PoseError::configuration(format!("failed to load classifier {}: {e}", path.display()))
        })?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| PoseError::configuration("classifier has no inputs"))?;
        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| PoseError::configuration("classifier has no outputs"))?;

        let mut classifier = Self {
            session: Mutex::new(session),
            input_name,
            output_name,
            num_classes: 0,
            source: path.display().to_string(),
        };

        // Probe with an all-zero batch to learn the output width.
        let probe = Array3::<f32>::zeros((1, NUM_CHANNELS, FIXED_FRAMES));
        let logits = classifier
            .forward(probe.view())
            .map_err(|e| PoseError::configuration(format!("classifier probe failed: {e}")))?;
        classifier.num_classes = logits.ncols();

        tracing::info!(
            path = %classifier.source,
            input = %classifier.input_name,
            output = %classifier.output_name,
            classes = classifier.num_classes,
            "Loaded sequence classifier"
        );

        Ok(classifier)
    }
}

impl SequenceClassifier for OnnxSequenceClassifier {
    fn forward(&self, input: ArrayView3<'_, f32>) -> PoseResult<Array2<f32>> {
        let shape = input.shape().to_vec();
        let data: Vec<f32> = input.iter().copied().collect();
        let tensor = Tensor::from_array((shape, data))
            .map_err(|e| PoseError::inference(format!("cannot build input tensor: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| PoseError::inference("classifier session lock poisoned"))?;
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => tensor])
            .map_err(|e| PoseError::inference(format!("forward pass failed: {e}")))?;

        let (out_shape, values) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| PoseError::inference(format!("cannot read logits: {e}")))?;

        let dims: Vec<usize> = out_shape.iter().map(|&d| d.max(0) as usize).collect();
        let (rows, cols) = match dims.as_slice() {
            [cols] => (1, *cols),
            [rows, cols] => (*rows, *cols),
            other => {
                return Err(PoseError::inference(format!(
                    "expected 2-D logits, got shape {other:?}"
                )))
            }
        };
        let logits = values.to_vec();
        Array2::from_shape_vec((rows, cols), logits)
            .map_err(|e| PoseError::inference(format!("logit buffer mismatch: {e}")))
    }

    fn num_classes(&self) -> Option<usize> {
        Some(self.num_classes)
    }

    fn describe(&self) -> String {
        format!("onnx:{}", self.source)
    }
}

fn build_session(path: &Path, intra_threads: usize) -> anyhow::Result<Session> {
    let session = Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(intra_threads.max(1))?
        .commit_from_file(path)?;
    Ok(session)
}
