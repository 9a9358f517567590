//! Decoded frames and frame ranges.

use serde::{Deserialize, Serialize};
use yogapose_common::error::{PoseError, PoseResult};

/// Channel order of an 8-bit, 3-channel frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    /// Blue-green-red, as most video decoders emit.
    Bgr8,
    /// Red-green-blue, as pose detectors expect.
    Rgb8,
}

/// One decoded frame, tightly packed, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl VideoFrame {
    /// Wrap packed pixel data, checking it is `width * height * 3` bytes.
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> PoseResult<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(PoseError::extraction(format!(
                "frame buffer is {} bytes, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Convert to RGB channel order. RGB frames pass through unchanged.
    pub fn into_rgb(mut self) -> Self {
        if self.format == PixelFormat::Bgr8 {
            for px in self.data.chunks_exact_mut(3) {
                px.swap(0, 2);
            }
            self.format = PixelFormat::Rgb8;
        }
        self
    }
}

/// Inclusive, 0-based frame range. `None` leaves that side open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameRange {
    pub start: Option<u64>,
    pub end: Option<u64>,
}

impl FrameRange {
    /// Every frame of the video.
    pub const ALL: FrameRange = FrameRange {
        start: None,
        end: None,
    };

    /// Frames `start..=end`.
    pub fn inclusive(start: u64, end: u64) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn is_before_start(&self, index: u64) -> bool {
        self.start.is_some_and(|s| index < s)
    }

    pub fn is_past_end(&self, index: u64) -> bool {
        self.end.is_some_and(|e| index > e)
    }

    pub fn contains(&self, index: u64) -> bool {
        !self.is_before_start(index) && !self.is_past_end(index)
    }

    /// A range whose start lies after its end selects nothing.
    pub fn is_empty(&self) -> bool {
        matches!((self.start, self.end), (Some(s), Some(e)) if s > e)
    }
}
