pub mod classify;
pub mod extract;
pub mod health;
pub mod labels;
pub mod predict;

use serde::Serialize;
use yogapose_common::config::AppConfig;
use yogapose_common::error::PoseResult;
use yogapose_keypoint_extractor::{DefaultVideoBackend, KeypointExtractor, OnnxDetectorFactory};
use yogapose_pose_model::{PredictionResponse, PredictionResult};

pub(crate) fn keypoint_extractor(config: &AppConfig) -> KeypointExtractor {
    KeypointExtractor::new(
        Box::new(DefaultVideoBackend),
        Box::new(OnnxDetectorFactory::new(config.detector.clone())),
    )
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print the response payload; a failure exits non-zero after printing.
pub(crate) fn emit_prediction(result: PoseResult<PredictionResult>) -> anyhow::Result<()> {
    let (status, response) = PredictionResponse::from_result(result);
    print_json(&response)?;
    if let PredictionResponse::Failure { error } = response {
        anyhow::bail!("prediction failed ({status}): {error}");
    }
    Ok(())
}
