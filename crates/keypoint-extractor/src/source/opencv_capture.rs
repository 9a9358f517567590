//! Video files decoded through OpenCV's `VideoCapture`.

use std::path::{Path, PathBuf};

use opencv::core::Mat;
use opencv::prelude::*;
use opencv::videoio;
use yogapose_common::error::{PoseError, PoseResult};

use super::VideoSource;
use crate::frame::{PixelFormat, VideoFrame};

/// OpenCV capture handle over one video file. Released on drop.
pub struct OpenCvVideoSource {
    capture: videoio::VideoCapture,
    path: PathBuf,
    buffer: Mat,
}

impl OpenCvVideoSource {
    pub fn open(path: &Path) -> PoseResult<Self> {
        if !path.exists() {
            return Err(PoseError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let path_str = path
            .to_str()
            .ok_or_else(|| PoseError::extraction(format!("non-UTF-8 path: {path:?}")))?;

        let capture = videoio::VideoCapture::from_file(path_str, videoio::CAP_ANY)
            .map_err(|e| cv_error("open", path, e))?;
        if !capture.is_opened().map_err(|e| cv_error("open", path, e))? {
            return Err(PoseError::extraction(format!(
                "cannot open video {}",
                path.display()
            )));
        }

        tracing::debug!(path = %path.display(), "Opened video capture");
        Ok(Self {
            capture,
            path: path.to_path_buf(),
            buffer: Mat::default(),
        })
    }
}

impl VideoSource for OpenCvVideoSource {
    fn next_frame(&mut self) -> PoseResult<Option<VideoFrame>> {
        let ok = self
            .capture
            .read(&mut self.buffer)
            .map_err(|e| cv_error("read", &self.path, e))?;
        if !ok || self.buffer.rows() <= 0 || self.buffer.cols() <= 0 {
            return Ok(None);
        }

        if self.buffer.channels() != 3 {
            return Err(PoseError::extraction(format!(
                "expected 3-channel frames from {}, got {}",
                self.path.display(),
                self.buffer.channels()
            )));
        }

        let width = self.buffer.cols() as u32;
        let height = self.buffer.rows() as u32;
        let data = if self.buffer.is_continuous() {
            self.buffer
                .data_bytes()
                .map_err(|e| cv_error("read", &self.path, e))?
                .to_vec()
        } else {
            self.buffer
                .try_clone()
                .and_then(|m| m.data_bytes().map(|b| b.to_vec()))
                .map_err(|e| cv_error("read", &self.path, e))?
        };

        VideoFrame::new(width, height, PixelFormat::Bgr8, data).map(Some)
    }

    fn skip_frame(&mut self) -> PoseResult<bool> {
        self.capture
            .grab()
            .map_err(|e| cv_error("grab", &self.path, e))
    }
}

impl Drop for OpenCvVideoSource {
    fn drop(&mut self) {
        if let Err(e) = self.capture.release() {
            tracing::warn!("Failed to release capture for {:?}: {}", self.path, e);
        } else {
            tracing::debug!(path = %self.path.display(), "Released video capture");
        }
    }
}

fn cv_error(op: &str, path: &Path, e: opencv::Error) -> PoseError {
    PoseError::extraction(format!("OpenCV {op} failed for {}: {e}", path.display()))
}
