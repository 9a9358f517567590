//! Upload validation, done before any extraction work starts.

use std::path::{Path, PathBuf};

use yogapose_common::config::RequestLimits;
use yogapose_common::error::{PoseError, PoseResult};
use yogapose_keypoint_extractor::FrameRange;

/// A validated prediction request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoseRequest {
    pub video: PathBuf,
    pub range: FrameRange,
}

impl PoseRequest {
    /// Check the input exists, has an allowed extension, fits the size limit,
    /// and that the frame bounds are ordered.
    ///
    /// Directories of frame images are accepted as-is; extension and size
    /// limits only apply to video files.
    pub fn validate(
        video: &Path,
        frame_start: u64,
        frame_end: u64,
        limits: &RequestLimits,
    ) -> PoseResult<Self> {
        if !video.exists() {
            return Err(PoseError::request(format!("No such file: {}", video.display())));
        }

        if !video.is_dir() {
            check_extension(video, &limits.allowed_extensions)?;

            let size = std::fs::metadata(video)?.len();
            if size > limits.max_upload_bytes {
                return Err(PoseError::request(format!(
                    "File is {size} bytes, limit is {}",
                    limits.max_upload_bytes
                )));
            }
        }

        if frame_start > frame_end {
            return Err(PoseError::request(format!(
                "frame_start ({frame_start}) must not exceed frame_end ({frame_end})"
            )));
        }

        Ok(Self {
            video: video.to_path_buf(),
            range: FrameRange::inclusive(frame_start, frame_end),
        })
    }
}

fn check_extension(video: &Path, allowed: &[String]) -> PoseResult<()> {
    let ext = video
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext {
        Some(ext) if allowed.iter().any(|a| a.eq_ignore_ascii_case(&ext)) => Ok(()),
        _ => {
            let names: Vec<String> = allowed.iter().map(|a| format!(".{a}")).collect();
            Err(PoseError::request(format!(
                "Only {} files are supported",
                names.join(", ")
            )))
        }
    }
}
