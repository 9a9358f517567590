//! End-to-end extraction over a directory of frame images.

use std::path::Path;

use yogapose_common::error::{PoseError, PoseResult};
use yogapose_keypoint_extractor::{
    DefaultVideoBackend, DetectorFactory, FrameRange, KeypointExtractor, PoseDetector, VideoFrame,
};
use yogapose_pose_model::{Joint, NUM_JOINTS};

/// "Detects" a body whenever the frame is bright, placing every joint at
/// the frame's mean red value.
struct BrightnessDetector;

impl PoseDetector for BrightnessDetector {
    fn detect(&mut self, frame: &VideoFrame) -> PoseResult<Option<Vec<Joint>>> {
        let red: u32 = frame.data().chunks_exact(3).map(|px| px[0] as u32).sum();
        let pixels = (frame.width() * frame.height()) as u32;
        let mean = red / pixels;
        if mean < 100 {
            return Ok(None);
        }
        Ok(Some(vec![[mean as f32, 1.0, -1.0]; NUM_JOINTS]))
    }
}

struct BrightnessFactory;

impl DetectorFactory for BrightnessFactory {
    fn create(&self) -> PoseResult<Box<dyn PoseDetector>> {
        Ok(Box::new(BrightnessDetector))
    }
}

fn write_frames(dir: &Path, reds: &[u8]) {
    for (i, red) in reds.iter().enumerate() {
        let img = image::RgbImage::from_pixel(8, 6, image::Rgb([*red, 10, 20]));
        img.save(dir.join(format!("frame_{i:04}.png"))).unwrap();
    }
}

fn extractor() -> KeypointExtractor {
    KeypointExtractor::new(Box::new(DefaultVideoBackend), Box::new(BrightnessFactory))
}

#[test]
fn extracts_requested_range_with_zero_fill() {
    let dir = tempfile::tempdir().unwrap();
    write_frames(dir.path(), &[200, 200, 50, 150, 250, 30, 200]);

    let extraction = extractor()
        .extract(dir.path(), FrameRange::inclusive(1, 4))
        .unwrap();

    let frames = extraction.sequence.frames();
    assert_eq!(frames.len(), 4);
    assert_eq!(frames[0].joints()[0], [200.0, 1.0, -1.0]);
    assert!(frames[1].is_zero());
    assert_eq!(frames[2].joints()[32], [150.0, 1.0, -1.0]);
    assert_eq!(frames[3].joints()[0][0], 250.0);
    assert_eq!(extraction.report.frames_detected, 3);
    assert_eq!(extraction.report.frames_missed, 1);
}

#[test]
fn open_range_reads_whole_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_frames(dir.path(), &[120; 12]);

    let extraction = extractor().extract(dir.path(), FrameRange::ALL).unwrap();
    assert_eq!(extraction.sequence.len(), 12);
    assert_eq!(extraction.sequence.detected_frames(), 12);
}

#[test]
fn missing_input_yields_empty_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let extraction = extractor()
        .extract(&dir.path().join("absent"), FrameRange::inclusive(0, 10))
        .unwrap();
    assert!(extraction.sequence.is_empty());
    assert_eq!(extraction.report.frames_read, 0);
}

#[cfg(not(feature = "opencv"))]
#[test]
fn video_file_without_decoder_is_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clip.mp4");
    std::fs::write(&path, b"\x00\x00\x00\x18ftypmp42").unwrap();

    let err = extractor().extract(&path, FrameRange::ALL).unwrap_err();
    assert!(matches!(err, PoseError::Unsupported { .. }));
}
