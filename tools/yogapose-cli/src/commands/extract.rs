//! Dump the raw keypoint sequence of a video.

use std::path::{Path, PathBuf};

use serde::Serialize;
use yogapose_common::config::AppConfig;
use yogapose_keypoint_extractor::{ExtractionReport, FrameRange};
use yogapose_pose_model::RawKeypointSequence;

#[derive(Serialize)]
struct ExtractOutput<'a> {
    video: &'a Path,
    range: FrameRange,
    report: ExtractionReport,
    keypoints: &'a RawKeypointSequence,
}

pub fn run(
    config: &AppConfig,
    video: PathBuf,
    frame_start: Option<u64>,
    frame_end: Option<u64>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let range = FrameRange {
        start: frame_start,
        end: frame_end,
    };
    if range.is_empty() {
        anyhow::bail!("--frame-start must not exceed --frame-end");
    }

    let extraction = super::keypoint_extractor(config).extract(&video, range)?;
    let report = extraction.report;

    match output {
        Some(path) => {
            extraction.sequence.save_json(&path)?;
            println!(
                "Wrote {} frames ({} detected) to {}",
                report.frames_retained,
                report.frames_detected,
                path.display()
            );
        }
        None => super::print_json(&ExtractOutput {
            video: &video,
            range,
            report,
            keypoints: &extraction.sequence,
        })?,
    }

    Ok(())
}
