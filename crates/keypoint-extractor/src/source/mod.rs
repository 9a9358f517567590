//! Video sources: sequential frame readers and the backend that opens them.

use std::path::Path;

use yogapose_common::error::PoseResult;

use crate::frame::VideoFrame;

pub mod frame_dir;
#[cfg(feature = "opencv")]
pub mod opencv_capture;

pub use frame_dir::FrameDirectorySource;
#[cfg(feature = "opencv")]
pub use opencv_capture::OpenCvVideoSource;

/// Sequential, 0-indexed frame reader.
///
/// Dropping the source releases the underlying handle.
pub trait VideoSource {
    /// Decode the next frame, or `None` at end of stream.
    fn next_frame(&mut self) -> PoseResult<Option<VideoFrame>>;

    /// Advance past one frame without needing its pixels.
    /// Returns false at end of stream.
    fn skip_frame(&mut self) -> PoseResult<bool> {
        Ok(self.next_frame()?.is_some())
    }
}

impl<S: VideoSource + ?Sized> VideoSource for Box<S> {
    fn next_frame(&mut self) -> PoseResult<Option<VideoFrame>> {
        (**self).next_frame()
    }

    fn skip_frame(&mut self) -> PoseResult<bool> {
        (**self).skip_frame()
    }
}

/// Opens video sources by path.
pub trait VideoBackend: Send + Sync {
    fn open(&self, path: &Path) -> PoseResult<Box<dyn VideoSource>>;

    /// Short backend name for diagnostics.
    fn name(&self) -> &'static str;
}

/// Directories of frame images are read directly; video files go through
/// OpenCV when the `opencv` feature is enabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultVideoBackend;

impl DefaultVideoBackend {
    /// Whether container files (not just frame directories) can be decoded.
    pub fn supports_video_files() -> bool {
        cfg!(feature = "opencv")
    }
}

impl VideoBackend for DefaultVideoBackend {
    fn open(&self, path: &Path) -> PoseResult<Box<dyn VideoSource>> {
        if !path.exists() {
            return Err(yogapose_common::error::PoseError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        if path.is_dir() {
            return Ok(Box::new(FrameDirectorySource::open(path)?));
        }
        open_video_file(path)
    }

    fn name(&self) -> &'static str {
        if Self::supports_video_files() {
            "opencv"
        } else {
            "frame-directory"
        }
    }
}

#[cfg(feature = "opencv")]
fn open_video_file(path: &Path) -> PoseResult<Box<dyn VideoSource>> {
    Ok(Box::new(OpenCvVideoSource::open(path)?))
}

#[cfg(not(feature = "opencv"))]
fn open_video_file(path: &Path) -> PoseResult<Box<dyn VideoSource>> {
    Err(yogapose_common::error::PoseError::unsupported(format!(
        "cannot decode {}: built without the `opencv` feature; pass a directory of frame images instead",
        path.display()
    )))
}
