//! YogaPose Pose Model
//!
//! Defines the data contracts flowing through the inference pipeline:
//! - **Keypoints:** Per-frame 33-joint world landmarks and raw sequences
//! - **Tensor:** The fixed `(99, 30)` channel-first classifier input
//! - **Labels:** The ordered class label set, index-aligned with model output
//! - **Prediction:** Ranked prediction results and response payloads
//!
//! Every entity here is transient: built for one request and dropped after it.

pub mod keypoints;
pub mod labels;
pub mod prediction;
pub mod tensor;

pub use keypoints::*;
pub use labels::*;
pub use prediction::*;
pub use tensor::*;

/// Joints reported per frame by the pose detector.
pub const NUM_JOINTS: usize = 33;

/// Coordinates per joint (x, y, z).
pub const NUM_COORDS: usize = 3;

/// Flattened joint channels per time step.
pub const NUM_CHANNELS: usize = NUM_JOINTS * NUM_COORDS;

/// Time steps in every normalized tensor.
pub const FIXED_FRAMES: usize = 30;

/// Length of the ranked prediction list (fewer if the label set is smaller).
pub const TOP_K: usize = 3;
