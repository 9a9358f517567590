//! Keypoints through normalization and classification, with a stand-in model.

use std::sync::Arc;
use std::thread;

use ndarray::{Array2, ArrayView3, Axis};
use yogapose_classifier::{predict_pose, InferenceContext, SequenceClassifier};
use yogapose_common::config::Standardization;
use yogapose_common::error::PoseResult;
use yogapose_pose_model::{
    ClassLabelSet, PoseFrame, PredictionResponse, RawKeypointSequence, NUM_JOINTS,
};
use yogapose_processing_core::SequenceNormalizer;

/// Scores class `k` by how much the first time steps differ from the last,
/// scaled by `k`. Sequences that move a lot favour higher classes.
struct MotionModel {
    classes: usize,
}

impl SequenceClassifier for MotionModel {
    fn forward(&self, input: ArrayView3<'_, f32>) -> PoseResult<Array2<f32>> {
        let batch = input.len_of(Axis(0));
        let mut out = Array2::zeros((batch, self.classes));
        for (b, sample) in input.axis_iter(Axis(0)).enumerate() {
            let first = sample.column(0);
            let last = sample.column(sample.ncols() - 1);
            let motion: f32 = first
                .iter()
                .zip(last.iter())
                .map(|(a, z)| (a - z).abs())
                .sum::<f32>()
                / first.len() as f32;
            for k in 0..self.classes {
                out[[b, k]] = -(motion - k as f32).abs();
            }
        }
        Ok(out)
    }

    fn num_classes(&self) -> Option<usize> {
        Some(self.classes)
    }

    fn describe(&self) -> String {
        format!("motion:{}", self.classes)
    }
}

fn context() -> InferenceContext {
    InferenceContext::new(
        Arc::new(MotionModel { classes: 5 }),
        ClassLabelSet::default_poses(),
        SequenceNormalizer::new(Standardization::Global),
    )
    .unwrap()
}

fn still_sequence(frames: usize) -> RawKeypointSequence {
    (0..frames)
        .map(|_| PoseFrame::new([[0.1, -0.2, 0.3]; NUM_JOINTS]))
        .collect()
}

#[test]
fn still_full_length_clip_predicts_lowest_motion_class() {
    let result = predict_pose(&context(), &still_sequence(30)).unwrap();
    assert_eq!(result.predicted_pose, "chair");
    assert_eq!(result.top3_predictions.len(), 3);
    assert_eq!(result.top3_predictions[0].pose, result.predicted_pose);
}

#[test]
fn any_length_yields_a_complete_prediction() {
    let ctx = context();
    for len in [0, 1, 15, 29, 30, 31, 120] {
        let result = predict_pose(&ctx, &still_sequence(len)).unwrap();
        let total: f32 = result.top3_predictions.iter().map(|r| r.confidence).sum();
        assert!(total <= 1.0 + 1e-5, "len {len}");
        assert!(result.confidence > 0.0 && result.confidence <= 1.0);
    }
}

#[test]
fn shared_context_serves_concurrent_requests() {
    let ctx = context();
    let expected = predict_pose(&ctx, &still_sequence(12)).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let ctx = ctx.clone();
            thread::spawn(move || predict_pose(&ctx, &still_sequence(12)).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn unloaded_context_produces_error_payload() {
    let ctx = InferenceContext::unloaded(SequenceNormalizer::default());
    let (status, response) = PredictionResponse::from_result(predict_pose(&ctx, &still_sequence(5)));

    assert_eq!(status, 500);
    assert!(!response.is_success());
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["error"], "Configuration error: Model not loaded");
}
