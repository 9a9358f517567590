//! The classifier input tensor.

use ndarray::{Array2, ArrayView2};
use yogapose_common::error::{PoseError, PoseResult};

use crate::{FIXED_FRAMES, NUM_CHANNELS};

/// Standardized `(channels, time)` tensor of shape `(99, 30)`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTensor {
    data: Array2<f32>,
}

impl NormalizedTensor {
    /// Wrap an array, rejecting anything that is not `(99, 30)`.
    pub fn from_array(data: Array2<f32>) -> PoseResult<Self> {
        if data.dim() != (NUM_CHANNELS, FIXED_FRAMES) {
            return Err(PoseError::input_shape(
                format!("({NUM_CHANNELS}, {FIXED_FRAMES})"),
                format!("{:?}", data.dim()),
            ));
        }
        Ok(Self { data })
    }

    /// Build a tensor by evaluating `f((channel, time))` for every element.
    pub fn from_fn(f: impl FnMut((usize, usize)) -> f32) -> Self {
        Self {
            data: Array2::from_shape_fn((NUM_CHANNELS, FIXED_FRAMES), f),
        }
    }

    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.data.view()
    }

    pub fn into_inner(self) -> Array2<f32> {
        self.data
    }

    /// `(channels, time)`.
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Column `t` of the tensor: all 99 channels at one time step.
    pub fn time_step(&self, t: usize) -> Vec<f32> {
        self.data.column(t).to_vec()
    }

    /// Scalar mean over the whole tensor.
    pub fn mean(&self) -> f64 {
        let n = self.data.len() as f64;
        self.data.iter().map(|&v| v as f64).sum::<f64>() / n
    }

    /// Population standard deviation over the whole tensor.
    pub fn std(&self) -> f64 {
        let mean = self.mean();
        let n = self.data.len() as f64;
        let var = self
            .data
            .iter()
            .map(|&v| (v as f64 - mean).powi(2))
            .sum::<f64>()
            / n;
        var.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_time_major_layout() {
        let err = NormalizedTensor::from_array(Array2::zeros((30, 99))).unwrap_err();
        assert!(matches!(err, PoseError::InputShape { .. }));
    }

    #[test]
    fn test_stats() {
        let mut data = Array2::zeros((99, 30));
        data[[0, 0]] = 1.0;
        data[[0, 1]] = -1.0;
        let tensor = NormalizedTensor::from_array(data).unwrap();
        assert_eq!(tensor.shape(), (99, 30));
        assert!(tensor.mean().abs() < 1e-12);
        let expected_std = (2.0f64 / 2970.0).sqrt();
        assert!((tensor.std() - expected_std).abs() < 1e-12);
    }
}
