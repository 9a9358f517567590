//! Frames stored as numbered image files in a directory.
//!
//! Files are ordered by name, so `frame_0001.png` style numbering with
//! fixed-width indices gives the expected frame order.

use std::path::{Path, PathBuf};

use yogapose_common::error::{PoseError, PoseResult};

use super::VideoSource;
use crate::frame::{PixelFormat, VideoFrame};

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Reads a directory of still images as a video.
#[derive(Debug)]
pub struct FrameDirectorySource {
    files: Vec<PathBuf>,
    cursor: usize,
}

impl FrameDirectorySource {
    pub fn open(dir: &Path) -> PoseResult<Self> {
        if !dir.is_dir() {
            return Err(PoseError::FileNotFound {
                path: dir.to_path_buf(),
            });
        }

        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && is_image(p))
            .collect();
        files.sort();

        tracing::debug!(dir = %dir.display(), frames = files.len(), "Opened frame directory");
        Ok(Self { files, cursor: 0 })
    }

    /// Frames in the directory.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl VideoSource for FrameDirectorySource {
    fn next_frame(&mut self) -> PoseResult<Option<VideoFrame>> {
        let Some(path) = self.files.get(self.cursor) else {
            return Ok(None);
        };
        self.cursor += 1;

        let rgb = image::open(path)
            .map_err(|e| PoseError::extraction(format!("cannot decode {}: {e}", path.display())))?
            .to_rgb8();
        let (width, height) = rgb.dimensions();
        VideoFrame::new(width, height, PixelFormat::Rgb8, rgb.into_raw()).map(Some)
    }

    fn skip_frame(&mut self) -> PoseResult<bool> {
        if self.cursor < self.files.len() {
            self.cursor += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
