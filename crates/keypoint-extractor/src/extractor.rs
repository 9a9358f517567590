//! The extraction walk: video frames in, raw keypoint sequence out.

use std::path::Path;

use serde::Serialize;
use yogapose_common::error::{PoseError, PoseResult};
use yogapose_pose_model::{PoseFrame, RawKeypointSequence};

use crate::detector::{DetectorFactory, PoseDetector};
use crate::frame::FrameRange;
use crate::source::{VideoBackend, VideoSource};

/// Counters describing one extraction call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    /// Frames pulled from the source, including skipped ones.
    pub frames_read: u64,
    /// Frames inside the range, i.e. the sequence length.
    pub frames_retained: u64,
    /// Retained frames with a detected body.
    pub frames_detected: u64,
    /// Retained frames zero-filled because detection found no body.
    pub frames_missed: u64,
}

/// A raw sequence plus how it was obtained.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub sequence: RawKeypointSequence,
    pub report: ExtractionReport,
}

/// Walk `source` from frame 0 and detect poses for every frame in `range`.
///
/// Frames before `range.start` are skipped, reading stops once the index
/// passes `range.end`, and a video shorter than the range simply ends the
/// sequence early. A missed detection records [`PoseFrame::ZERO`].
///
/// Both handles are consumed and dropped before this returns, on every path.
pub fn extract_keypoints<S, D>(mut source: S, mut detector: D, range: FrameRange) -> PoseResult<Extraction>
where
    S: VideoSource,
    D: PoseDetector,
{
    let mut extraction = Extraction::default();
    let report = &mut extraction.report;
    let mut index: u64 = 0;

    loop {
        if range.is_before_start(index) {
            match source.skip_frame() {
                Ok(true) => {
                    report.frames_read += 1;
                    index += 1;
                    continue;
                }
                Ok(false) => break,
                Err(e) => {
                    tracing::warn!(frame = index, "Stopping extraction on read error: {}", e);
                    break;
                }
            }
        }

        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(frame = index, "Stopping extraction on read error: {}", e);
                break;
            }
        };
        report.frames_read += 1;

        if range.is_past_end(index) {
            break;
        }

        let rgb = frame.into_rgb();
        let pose = match detector.detect(&rgb)? {
            Some(joints) => {
                report.frames_detected += 1;
                PoseFrame::try_from_joints(joints).map_err(|e| match e {
                    PoseError::InputShape { expected, actual } => PoseError::InputShape {
                        expected,
                        actual: format!("{actual} at frame {index}"),
                    },
                    other => other,
                })?
            }
            None => {
                report.frames_missed += 1;
                PoseFrame::ZERO
            }
        };
        extraction.sequence.push(pose);
        report.frames_retained += 1;
        index += 1;
    }

    tracing::debug!(
        read = extraction.report.frames_read,
        retained = extraction.report.frames_retained,
        detected = extraction.report.frames_detected,
        missed = extraction.report.frames_missed,
        "Extraction finished"
    );

    Ok(extraction)
}

/// Opens a video and a detector for each call and runs [`extract_keypoints`].
pub struct KeypointExtractor {
    backend: Box<dyn VideoBackend>,
    detectors: Box<dyn DetectorFactory>,
}

impl KeypointExtractor {
    pub fn new(backend: Box<dyn VideoBackend>, detectors: Box<dyn DetectorFactory>) -> Self {
        Self { backend, detectors }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Extract keypoints for `range` of the video at `path`.
    ///
    /// A video that cannot be opened yields an empty sequence; the normalizer
    /// pads that to an all-zero tensor. A backend that cannot decode this
    /// kind of input at all is reported as `Unsupported`.
    pub fn extract(&self, path: &Path, range: FrameRange) -> PoseResult<Extraction> {
        tracing::info!(
            path = %path.display(),
            start = ?range.start,
            end = ?range.end,
            backend = self.backend.name(),
            "Extracting keypoints"
        );

        let source = match self.backend.open(path) {
            Ok(source) => source,
            Err(e @ PoseError::Unsupported { .. }) => return Err(e),
            Err(e) => {
                tracing::warn!("Could not open {:?}, returning empty sequence: {}", path, e);
                return Ok(Extraction::default());
            }
        };

        let detector = self.detectors.create()?;
        extract_keypoints(source, detector, range)
    }
}
