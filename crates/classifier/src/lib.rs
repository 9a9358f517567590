//! YogaPose Classifier
//!
//! Wraps a trained sequence classifier behind a fixed contract: a normalized
//! `(99, 30)` tensor goes in, a [`PredictionResult`] or a structured error
//! comes out. Failures never escape as panics.
//!
//! [`PredictionResult`]: yogapose_pose_model::PredictionResult

pub mod context;
pub mod decode;
pub mod model;
pub mod predict;

pub use context::InferenceContext;
pub use decode::{rank, softmax, top_k};
pub use model::{OnnxSequenceClassifier, SequenceClassifier};
pub use predict::{classify, predict_pose};
