//! YogaPose Processing Core
//!
//! Turns raw keypoint sequences into classifier input:
//! - **Normalization:** Pad/truncate to 30 frames, standardize, lay out channel-first
//! - **Smoothing:** Optional temporal filters over per-joint coordinate tracks
//!
//! This crate is pure computation with no I/O and no model handles.
//! All inputs are data; all outputs are data.

pub mod normalize;
pub mod smoothing;

pub use normalize::SequenceNormalizer;
pub use smoothing::KeypointSmoother;
