//! Sequence normalization: the raw keypoint sequence to `(99, 30)` tensor step.
//!
//! # Algorithm
//!
//! 1. **Fit length:** append all-zero frames up to 30, or keep only the first 30.
//!    Long clips are not resampled.
//! 2. **Standardize:** `(x - mean) / std` with one scalar mean and population std
//!    over the whole `30 x 33 x 3` block. A std of exactly zero is replaced by 1.
//! 3. **Lay out:** flatten joints and coordinates into 99 channels
//!    (`joint * 3 + coord`) and store channel-first, `(channels, time)`.

use ndarray::Array2;
use yogapose_common::config::Standardization;
use yogapose_pose_model::{
    NormalizedTensor, RawKeypointSequence, FIXED_FRAMES, NUM_CHANNELS,
};

/// Stateless normalizer; the same input always yields the same tensor.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceNormalizer {
    standardization: Standardization,
}

impl SequenceNormalizer {
    pub fn new(standardization: Standardization) -> Self {
        Self { standardization }
    }

    pub fn standardization(&self) -> Standardization {
        self.standardization
    }

    /// Normalize a sequence of any length, including zero.
    pub fn normalize(&self, sequence: &RawKeypointSequence) -> NormalizedTensor {
        let fixed = fit_length(sequence);

        tracing::trace!(
            frames = sequence.len(),
            padded = FIXED_FRAMES.saturating_sub(sequence.len()),
            truncated = sequence.len().saturating_sub(FIXED_FRAMES),
            "Normalizing keypoint sequence"
        );

        match self.standardization {
            Standardization::Global => {
                let (mean, std) = mean_std(fixed.iter().copied());
                NormalizedTensor::from_fn(|(c, t)| standardize(fixed[[t, c]], mean, std))
            }
            Standardization::PerChannel => {
                let stats: Vec<(f64, f64)> = fixed
                    .columns()
                    .into_iter()
                    .map(|channel| mean_std(channel.iter().copied()))
                    .collect();
                NormalizedTensor::from_fn(|(c, t)| {
                    let (mean, std) = stats[c];
                    standardize(fixed[[t, c]], mean, std)
                })
            }
        }
    }
}

/// Time-major `(30, 99)` block: the first 30 frames, zero-padded at the end.
fn fit_length(sequence: &RawKeypointSequence) -> Array2<f32> {
    let mut fixed = Array2::<f32>::zeros((FIXED_FRAMES, NUM_CHANNELS));
    for (mut row, frame) in fixed.rows_mut().into_iter().zip(sequence.frames()) {
        for (slot, value) in row.iter_mut().zip(frame.values()) {
            *slot = value;
        }
    }
    fixed
}

/// Scalar mean and population std. A zero std is reported as 1.
fn mean_std(values: impl Iterator<Item = f32> + Clone) -> (f64, f64) {
    let mut count = 0usize;
    let mut sum = 0.0f64;
    for v in values.clone() {
        sum += v as f64;
        count += 1;
    }
    if count == 0 {
        return (0.0, 1.0);
    }
    let mean = sum / count as f64;
    let var = values.map(|v| (v as f64 - mean).powi(2)).sum::<f64>() / count as f64;
    let std = var.sqrt();
    (mean, if std > 0.0 { std } else { 1.0 })
}

fn standardize(value: f32, mean: f64, std: f64) -> f32 {
    ((value as f64 - mean) / std) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use yogapose_pose_model::{PoseFrame, NUM_JOINTS};

    /// Frame whose joint `j` coordinate `k` is `base + j + k / 10`.
    fn ramp_frame(base: f32) -> PoseFrame {
        let mut joints = [[0.0f32; 3]; NUM_JOINTS];
        for (j, joint) in joints.iter_mut().enumerate() {
            for (k, v) in joint.iter_mut().enumerate() {
                *v = base + j as f32 + k as f32 / 10.0;
            }
        }
        PoseFrame::new(joints)
    }

    fn ramp_sequence(len: usize) -> RawKeypointSequence {
        (0..len).map(|i| ramp_frame(i as f32)).collect()
    }

    #[test]
    fn test_empty_sequence_is_all_zero() {
        let tensor = SequenceNormalizer::default().normalize(&RawKeypointSequence::new());
        assert_eq!(tensor.shape(), (99, 30));
        assert!(tensor.view().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_constant_input_has_no_nan() {
        let mut joints = [[0.0f32; 3]; NUM_JOINTS];
        for joint in joints.iter_mut() {
            *joint = [2.5, 2.5, 2.5];
        }
        let seq: RawKeypointSequence = (0..30).map(|_| PoseFrame::new(joints)).collect();

        let tensor = SequenceNormalizer::default().normalize(&seq);
        assert!(tensor.view().iter().all(|v| v.is_finite()));
        assert!(tensor.view().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_channel_layout() {
        // Joint 5, coordinate 2 of frame 7 lands in channel 17, column 7.
        let seq = ramp_sequence(30);
        let tensor = SequenceNormalizer::default().normalize(&seq);

        let raw: Vec<f32> = seq.frames().iter().flat_map(|f| f.values()).collect();
        let (mean, std) = mean_std(raw.iter().copied());
        let expected = standardize(seq.frames()[7].joints()[5][2], mean, std);
        assert!((tensor.view()[[17, 7]] - expected).abs() < 1e-6);
    }

    #[test]
    fn test_truncation_keeps_first_frames() {
        let long = ramp_sequence(45);
        let first: RawKeypointSequence = long.frames()[..30].iter().copied().collect();

        let normalizer = SequenceNormalizer::default();
        assert_eq!(normalizer.normalize(&long), normalizer.normalize(&first));
    }

    #[test]
    fn test_padding_columns_hold_normalized_zero() {
        let seq = ramp_sequence(10);
        let tensor = SequenceNormalizer::default().normalize(&seq);

        // Pre-standardization block: 10 frames of data, 20 zero frames.
        let mut raw: Vec<f32> = seq.frames().iter().flat_map(|f| f.values()).collect();
        raw.resize(30 * 99, 0.0);
        let (mean, std) = mean_std(raw.iter().copied());
        let zero = standardize(0.0, mean, std);

        for t in 10..30 {
            assert!(tensor.time_step(t).iter().all(|&v| (v - zero).abs() < 1e-6));
        }
        assert!(tensor.time_step(9).iter().any(|&v| (v - zero).abs() > 1e-3));
    }

    #[test]
    fn test_global_output_is_standardized() {
        let tensor = SequenceNormalizer::default().normalize(&ramp_sequence(30));
        assert!(tensor.mean().abs() < 1e-5);
        assert!((tensor.std() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_per_channel_standardizes_each_channel() {
        let normalizer = SequenceNormalizer::new(Standardization::PerChannel);
        let tensor = normalizer.normalize(&ramp_sequence(30));

        for channel in tensor.view().rows() {
            let (mean, std) = mean_std(channel.iter().copied());
            assert!(mean.abs() < 1e-5);
            assert!((std - 1.0).abs() < 1e-4);
        }
    }
}
