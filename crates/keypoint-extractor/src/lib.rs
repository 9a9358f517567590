//! YogaPose Keypoint Extractor
//!
//! Walks a video frame by frame and records 33 world-space joints per frame
//! for the requested inclusive frame range.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │               KeypointExtractor               │
//! │  ┌──────────────┐         ┌────────────────┐  │
//! │  │ VideoSource  │ frames  │ PoseDetector   │  │
//! │  │ (dir/OpenCV) ├────────►│ (ONNX)         │  │
//! │  └──────────────┘  RGB    └───────┬────────┘  │
//! │                                   │ 33 x 3    │
//! │                                   ▼           │
//! │                  RawKeypointSequence          │
//! │        (zero-filled frame on no detection)    │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! Both handles are owned by a single extraction call and dropped when it
//! returns, on success and on error alike.

pub mod detector;
pub mod extractor;
pub mod frame;
pub mod source;

pub use detector::{DetectorFactory, OnnxDetectorFactory, OnnxPoseDetector, PoseDetector};
pub use extractor::*;
pub use frame::*;
pub use source::{DefaultVideoBackend, FrameDirectorySource, VideoBackend, VideoSource};
