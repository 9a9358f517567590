//! Predict the pose in a frame range of a video.

use std::path::{Path, PathBuf};

use yogapose_classifier::{predict_pose, InferenceContext};
use yogapose_common::config::AppConfig;
use yogapose_common::error::PoseResult;
use yogapose_pose_model::PredictionResult;
use yogapose_processing_core::KeypointSmoother;

use crate::request::PoseRequest;

pub fn run(config: &AppConfig, video: PathBuf, frame_start: u64, frame_end: u64) -> anyhow::Result<()> {
    let ctx = InferenceContext::load(config);
    super::emit_prediction(predict_video(config, &ctx, &video, frame_start, frame_end))
}

fn predict_video(
    config: &AppConfig,
    ctx: &InferenceContext,
    video: &Path,
    frame_start: u64,
    frame_end: u64,
) -> PoseResult<PredictionResult> {
    // Checked before the upload is even looked at.
    ctx.ensure_loaded()?;

    let request = PoseRequest::validate(video, frame_start, frame_end, &config.request)?;
    let extraction = super::keypoint_extractor(config).extract(&request.video, request.range)?;

    tracing::info!(
        frames = extraction.report.frames_retained,
        detected = extraction.report.frames_detected,
        "Keypoints extracted"
    );

    let smoother = KeypointSmoother::from_config(&config.pipeline.smoothing);
    let sequence = smoother.smooth(&extraction.sequence);
    predict_pose(ctx, &sequence)
}
