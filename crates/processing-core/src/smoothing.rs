//! Temporal smoothing of keypoint tracks.
//!
//! Detection runs independently per frame, so joint positions jitter from
//! frame to frame. These filters run over each of the 99 coordinate tracks.
//! Zero-filled frames (missed detections) are left untouched and skipped, so
//! they neither get smoothed into a fake pose nor drag the filter toward zero.

use yogapose_common::config::SmoothingConfig;
use yogapose_pose_model::{RawKeypointSequence, NUM_CHANNELS, NUM_COORDS};

/// Keypoint smoothing engine.
pub struct KeypointSmoother {
    algorithm: SmoothingAlgorithm,
}

/// Available smoothing algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SmoothingAlgorithm {
    /// Exponential Moving Average.
    ///
    /// `strength` is in [0.0, 1.0], where larger values mean more smoothing.
    Ema { strength: f32 },

    /// Centered moving average over a window of N detected frames.
    MovingAverage { window: usize },

    /// 1D Kalman filter per coordinate track.
    ///
    /// `strength` is in [0.0, 1.0], where larger values mean more smoothing.
    Kalman { strength: f32 },

    /// No smoothing. Frames pass through unchanged.
    None,
}

impl KeypointSmoother {
    pub fn new(algorithm: SmoothingAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn from_config(config: &SmoothingConfig) -> Self {
        Self::new(Self::algorithm_from_config(config))
    }

    /// Map the pipeline config onto an algorithm, clamping strengths.
    pub fn algorithm_from_config(config: &SmoothingConfig) -> SmoothingAlgorithm {
        match *config {
            SmoothingConfig::None => SmoothingAlgorithm::None,
            SmoothingConfig::Ema { strength } => SmoothingAlgorithm::Ema {
                strength: clamp01(strength),
            },
            SmoothingConfig::MovingAverage { window } => {
                SmoothingAlgorithm::MovingAverage { window }
            }
            SmoothingConfig::Kalman { strength } => SmoothingAlgorithm::Kalman {
                strength: clamp01(strength),
            },
        }
    }

    pub fn algorithm(&self) -> SmoothingAlgorithm {
        self.algorithm
    }

    /// Smooth a sequence. Output has the same length and the same zero frames.
    pub fn smooth(&self, sequence: &RawKeypointSequence) -> RawKeypointSequence {
        if self.algorithm == SmoothingAlgorithm::None {
            return sequence.clone();
        }

        let detected: Vec<usize> = sequence
            .frames()
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.is_zero())
            .map(|(i, _)| i)
            .collect();

        let mut out = sequence.clone();
        if detected.len() < 2 {
            return out;
        }

        let mut track = Vec::with_capacity(detected.len());
        for channel in 0..NUM_CHANNELS {
            let (joint, coord) = (channel / NUM_COORDS, channel % NUM_COORDS);

            track.clear();
            track.extend(
                detected
                    .iter()
                    .map(|&i| sequence.frames()[i].joints()[joint][coord]),
            );

            let smoothed = match self.algorithm {
                SmoothingAlgorithm::Ema { strength } => smooth_ema(&track, strength),
                SmoothingAlgorithm::MovingAverage { window } => {
                    smooth_moving_average(&track, window)
                }
                SmoothingAlgorithm::Kalman { strength } => smooth_kalman(&track, strength),
                SmoothingAlgorithm::None => track.clone(),
            };

            for (&i, value) in detected.iter().zip(smoothed) {
                out.frames_mut()[i].joints_mut()[joint][coord] = value;
            }
        }

        out
    }
}

impl Default for KeypointSmoother {
    fn default() -> Self {
        Self::new(SmoothingAlgorithm::None)
    }
}

/// `alpha = 1 - strength`, then `smoothed = alpha * current + (1 - alpha) * previous`.
fn smooth_ema(raw: &[f32], strength: f32) -> Vec<f32> {
    let Some(&first) = raw.first() else {
        return vec![];
    };

    let alpha = clamp01(1.0 - strength);
    let mut prev = first;
    let mut result = Vec::with_capacity(raw.len());
    result.push(first);

    for &v in &raw[1..] {
        prev = alpha * v + (1.0 - alpha) * prev;
        result.push(prev);
    }

    result
}

fn smooth_moving_average(raw: &[f32], window: usize) -> Vec<f32> {
    if raw.is_empty() || window == 0 {
        return raw.to_vec();
    }

    (0..raw.len())
        .map(|i| {
            let start = i.saturating_sub(window / 2);
            let end = (i + window / 2 + 1).min(raw.len());
            raw[start..end].iter().sum::<f32>() / (end - start) as f32
        })
        .collect()
}

fn smooth_kalman(raw: &[f32], strength: f32) -> Vec<f32> {
    let Some(&first) = raw.first() else {
        return vec![];
    };

    let strength = clamp01(strength);
    let q = 0.001 + (1.0 - strength) * 0.01;
    let r = 0.001 + strength * 0.04;

    let mut x = first;
    let mut p = 1.0f32;
    let mut result = Vec::with_capacity(raw.len());

    for &z in raw {
        p += q;
        let k = p / (p + r);
        x += k * (z - x);
        p *= 1.0 - k;
        result.push(x);
    }

    result
}

fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}
