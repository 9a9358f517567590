use proptest::prelude::*;

use yogapose_common::config::Standardization;
use yogapose_pose_model::{PoseFrame, RawKeypointSequence, NUM_JOINTS};
use yogapose_processing_core::SequenceNormalizer;

fn frame_from(values: &[f32]) -> PoseFrame {
    let mut joints = [[0.0f32; 3]; NUM_JOINTS];
    for (i, v) in values.iter().enumerate().take(NUM_JOINTS * 3) {
        joints[i / 3][i % 3] = *v;
    }
    PoseFrame::new(joints)
}

fn sequence_strategy(max_len: usize) -> impl Strategy<Value = RawKeypointSequence> {
    prop::collection::vec(prop::collection::vec(-2.0f32..2.0, 99), 0..max_len)
        .prop_map(|frames| {
            frames
                .iter()
                .map(|f| frame_from(f))
                .collect::<RawKeypointSequence>()
        })
}

proptest! {
    #[test]
    fn output_is_always_99_by_30(seq in sequence_strategy(80)) {
        let tensor = SequenceNormalizer::default().normalize(&seq);
        prop_assert_eq!(tensor.shape(), (99, 30));
        prop_assert!(tensor.view().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn normalizing_twice_is_a_fixed_point(seq in sequence_strategy(40)) {
        let normalizer = SequenceNormalizer::default();
        let once = normalizer.normalize(&seq);

        // Feed the standardized tensor back in as a 30-frame sequence.
        let frames: RawKeypointSequence = (0..30)
            .map(|t| frame_from(&once.time_step(t)))
            .collect();
        let twice = normalizer.normalize(&frames);

        for (a, b) in once.view().iter().zip(twice.view().iter()) {
            prop_assert!((a - b).abs() < 1e-3, "{} vs {}", a, b);
        }
    }
}

#[test]
fn lengths_from_the_edge_cases_all_fit() {
    let normalizer = SequenceNormalizer::new(Standardization::Global);
    for len in [0usize, 1, 29, 30, 31, 1000] {
        let seq: RawKeypointSequence = (0..len)
            .map(|i| frame_from(&[i as f32 * 0.01; 99]))
            .collect();
        assert_eq!(normalizer.normalize(&seq).shape(), (99, 30), "len {len}");
    }
}

#[test]
fn forty_five_frames_truncate_to_the_first_thirty() {
    let seq: RawKeypointSequence = (0..45)
        .map(|i| frame_from(&[i as f32; 99]))
        .collect();
    let tensor = SequenceNormalizer::default().normalize(&seq);
    assert_eq!(tensor.shape(), (99, 30));

    // Frames 30..45 (values >= 30) are gone: the last column is frame 29,
    // the largest value kept.
    let max = tensor
        .view()
        .iter()
        .copied()
        .fold(f32::NEG_INFINITY, f32::max);
    assert!(tensor.time_step(29).iter().all(|&v| (v - max).abs() < 1e-6));
}
