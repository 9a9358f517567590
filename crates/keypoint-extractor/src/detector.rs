//! Single-frame pose detection.
//!
//! Detectors look at one RGB frame at a time. No tracking state is carried
//! between frames, so results for a frame never depend on its neighbours.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgb};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use yogapose_common::config::DetectorConfig;
use yogapose_common::error::{PoseError, PoseResult};
use yogapose_pose_model::{Joint, NUM_COORDS, NUM_JOINTS};

use crate::frame::{PixelFormat, VideoFrame};

/// Runs pose detection on a frame.
pub trait PoseDetector {
    /// World landmarks for the detected body, or `None` when no body is found.
    fn detect(&mut self, frame: &VideoFrame) -> PoseResult<Option<Vec<Joint>>>;
}

impl<D: PoseDetector + ?Sized> PoseDetector for Box<D> {
    fn detect(&mut self, frame: &VideoFrame) -> PoseResult<Option<Vec<Joint>>> {
        (**self).detect(frame)
    }
}

/// Creates a fresh detector for each extraction call.
pub trait DetectorFactory: Send + Sync {
    fn create(&self) -> PoseResult<Box<dyn PoseDetector>>;
}

/// ONNX landmark model in the BlazePose layout: NHWC `[1, S, S, 3]` input in
/// `[0, 1]`, a presence score output, and a flattened world-landmark output
/// whose first 33 joints are the body.
pub struct OnnxPoseDetector {
    session: Session,
    input_name: String,
    input_size: u32,
    world_output: String,
    presence_output: String,
    min_confidence: f32,
}

impl OnnxPoseDetector {
    pub fn load(config: &DetectorConfig) -> PoseResult<Self> {
        if !config.model_path.exists() {
            return Err(PoseError::configuration(format!(
                "pose detector model not found at {}",
                config.model_path.display()
            )));
        }

        let session = build_session(&config.model_path).map_err(|e| {
            PoseError::configuration(format!(
                "failed to load pose detector {}: {e}",
                config.model_path.display()
            ))
        })?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| PoseError::configuration("pose detector has no inputs"))?;

        for wanted in [&config.world_landmarks_output, &config.presence_output] {
            if !session.outputs.iter().any(|o| &o.name == wanted) {
                return Err(PoseError::configuration(format!(
                    "pose detector has no output named {wanted:?}"
                )));
            }
        }

        tracing::info!(
            path = %config.model_path.display(),
            input = %input_name,
            size = config.input_size,
            "Loaded pose detector"
        );

        Ok(Self {
            session,
            input_name,
            input_size: config.input_size,
            world_output: config.world_landmarks_output.clone(),
            presence_output: config.presence_output.clone(),
            min_confidence: config.min_detection_confidence,
        })
    }

    /// Resize to the square model input and scale to `[0, 1]`, NHWC.
    fn prepare_input(&self, frame: &VideoFrame) -> PoseResult<(Vec<usize>, Vec<f32>)> {
        if frame.format() != PixelFormat::Rgb8 {
            return Err(PoseError::extraction("pose detector expects RGB frames"));
        }
        let view: ImageBuffer<Rgb<u8>, &[u8]> =
            ImageBuffer::from_raw(frame.width(), frame.height(), frame.data())
                .ok_or_else(|| PoseError::extraction("frame buffer does not match its size"))?;

        let size = self.input_size;
        let resized = imageops::resize(&view, size, size, FilterType::Triangle);
        let s = size as usize;
        let data = resized
            .into_raw()
            .into_iter()
            .map(|v| v as f32 / 255.0)
            .collect();
        Ok((vec![1, s, s, 3], data))
    }
}

impl PoseDetector for OnnxPoseDetector {
    fn detect(&mut self, frame: &VideoFrame) -> PoseResult<Option<Vec<Joint>>> {
        let input = self.prepare_input(frame)?;
        let tensor = Tensor::from_array(input)
            .map_err(|e| PoseError::extraction(format!("cannot build detector input: {e}")))?;

        let min_confidence = self.min_confidence;
        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => tensor])
            .map_err(|e| PoseError::extraction(format!("pose detection failed: {e}")))?;

        let (_, presence) = outputs[self.presence_output.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| PoseError::extraction(format!("bad presence output: {e}")))?;
        let score = presence.first().copied().unwrap_or(0.0);
        if score < min_confidence {
            return Ok(None);
        }

        let (_, values) = outputs[self.world_output.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| PoseError::extraction(format!("bad landmark output: {e}")))?;
        if values.len() < NUM_JOINTS * NUM_COORDS {
            return Err(PoseError::input_shape(
                format!("at least {} landmark values", NUM_JOINTS * NUM_COORDS),
                format!("{} values", values.len()),
            ));
        }

        let joints = values
            .chunks_exact(NUM_COORDS)
            .take(NUM_JOINTS)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        Ok(Some(joints))
    }
}

fn build_session(path: &Path) -> anyhow::Result<Session> {
    let session = Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .commit_from_file(path)?;
    Ok(session)
}

/// Loads a new [`OnnxPoseDetector`] per extraction call.
#[derive(Debug, Clone)]
pub struct OnnxDetectorFactory {
    config: DetectorConfig,
}

impl OnnxDetectorFactory {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }
}

impl DetectorFactory for OnnxDetectorFactory {
    fn create(&self) -> PoseResult<Box<dyn PoseDetector>> {
        Ok(Box::new(OnnxPoseDetector::load(&self.config)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = DetectorConfig {
            model_path: dir.path().join("pose_landmark_full.onnx"),
            ..Default::default()
        };
        let err = OnnxDetectorFactory::new(config).create().err().unwrap();
        assert!(matches!(err, PoseError::Configuration { .. }));
    }
}
