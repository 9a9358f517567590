//! Predict from a keypoint sequence that was extracted earlier.

use std::path::{Path, PathBuf};

use yogapose_classifier::{predict_pose, InferenceContext};
use yogapose_common::config::AppConfig;
use yogapose_common::error::{PoseError, PoseResult};
use yogapose_pose_model::{PredictionResult, RawKeypointSequence};
use yogapose_processing_core::KeypointSmoother;

pub fn run(config: &AppConfig, keypoints: PathBuf) -> anyhow::Result<()> {
    let ctx = InferenceContext::load(config);
    super::emit_prediction(classify_file(config, &ctx, &keypoints))
}

fn classify_file(
    config: &AppConfig,
    ctx: &InferenceContext,
    keypoints: &Path,
) -> PoseResult<PredictionResult> {
    ctx.ensure_loaded()?;

    if !keypoints.exists() {
        return Err(PoseError::request(format!(
            "No such file: {}",
            keypoints.display()
        )));
    }
    let content = std::fs::read_to_string(keypoints)?;
    let nested: Vec<Vec<Vec<f32>>> = serde_json::from_str(&content)
        .map_err(|e| PoseError::request(format!("keypoints must be a frames x 33 x 3 array: {e}")))?;
    let sequence = RawKeypointSequence::from_nested(nested)?;

    let sequence = KeypointSmoother::from_config(&config.pipeline.smoothing).smooth(&sequence);
    predict_pose(ctx, &sequence)
}
