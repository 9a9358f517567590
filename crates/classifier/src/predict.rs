//! Classification entry points.

use ndarray::Axis;
use yogapose_common::error::{PoseError, PoseResult};
use yogapose_pose_model::{
    NormalizedTensor, PredictionResult, RankedPose, RawKeypointSequence, TOP_K,
};

use crate::context::InferenceContext;
use crate::decode::{rank, softmax};

/// Classify a normalized tensor.
///
/// Adds the batch dimension, runs the forward pass, and ranks the softmax
/// probabilities. The top entry becomes the predicted pose; up to three
/// entries are reported.
pub fn classify(ctx: &InferenceContext, tensor: &NormalizedTensor) -> PoseResult<PredictionResult> {
    let (model, labels) = ctx.require_loaded()?;

    let batch = tensor.view().insert_axis(Axis(0));
    let logits = model.forward(batch)?;

    if logits.dim() != (1, labels.len()) {
        return Err(PoseError::inference(format!(
            "classifier returned logits of shape {:?}, expected (1, {})",
            logits.dim(),
            labels.len()
        )));
    }

    let row: Vec<f32> = logits.row(0).to_vec();
    if row.iter().any(|v| !v.is_finite()) {
        return Err(PoseError::inference("classifier returned non-finite logits"));
    }

    let probabilities = softmax(&row);
    let order = rank(&probabilities);

    let ranked: Vec<RankedPose> = order
        .iter()
        .take(TOP_K)
        .filter_map(|&i| {
            labels.get(i).map(|pose| RankedPose {
                pose: pose.to_string(),
                confidence: probabilities[i],
            })
        })
        .collect();

    let best = ranked
        .first()
        .cloned()
        .ok_or_else(|| PoseError::inference("classifier produced no classes"))?;

    tracing::debug!(
        pose = %best.pose,
        confidence = best.confidence,
        model = %model.describe(),
        "Classified sequence"
    );

    Ok(PredictionResult {
        predicted_pose: best.pose,
        confidence: best.confidence,
        top3_predictions: ranked,
    })
}

/// Normalize a raw keypoint sequence and classify it.
///
/// Fails with a configuration error before doing any work when the context
/// has no model or labels.
pub fn predict_pose(
    ctx: &InferenceContext,
    sequence: &RawKeypointSequence,
) -> PoseResult<PredictionResult> {
    ctx.ensure_loaded()?;
    let tensor = ctx.normalizer().normalize(sequence);
    classify(ctx, &tensor)
}
