//! Prediction results and the response payload handed back to callers.

use serde::{Deserialize, Serialize};
use yogapose_common::error::PoseResult;

/// One entry of the ranked prediction list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPose {
    pub pose: String,
    /// Softmax probability in `[0, 1]`.
    pub confidence: f32,
}

/// Outcome of one successful inference call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Highest-probability label.
    pub predicted_pose: String,

    /// Probability of `predicted_pose`.
    pub confidence: f32,

    /// Up to three labels, descending by probability. The first entry is
    /// always the predicted pose.
    pub top3_predictions: Vec<RankedPose>,
}

/// Either a complete prediction or an error message, never a partial result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionResponse {
    Success(PredictionResult),
    Failure { error: String },
}

impl PredictionResponse {
    /// Convert a pipeline result into a payload and its status code.
    pub fn from_result(result: PoseResult<PredictionResult>) -> (u16, Self) {
        match result {
            Ok(prediction) => (200, PredictionResponse::Success(prediction)),
            Err(e) => (
                e.status_code(),
                PredictionResponse::Failure {
                    error: e.to_string(),
                },
            ),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PredictionResponse::Success(_))
    }
}
