//! Per-frame joint arrays and raw keypoint sequences.
//!
//! Coordinates are world landmarks in the detector's metric frame. A frame
//! where detection failed is stored as all zeros rather than dropped, so a
//! sequence always has one entry per frame read.

use std::path::Path;

use serde::{Deserialize, Serialize};
use yogapose_common::error::{PoseError, PoseResult};

use crate::{NUM_COORDS, NUM_JOINTS};

/// A single joint coordinate `[x, y, z]`.
pub type Joint = [f32; NUM_COORDS];

/// Shape description used in shape errors.
const EXPECTED_SHAPE: &str = "(frames, 33, 3)";

/// All 33 joints of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Joint>", into = "Vec<Joint>")]
pub struct PoseFrame {
    joints: [Joint; NUM_JOINTS],
}

impl PoseFrame {
    /// Zero-filled frame recorded when no body was detected.
    pub const ZERO: PoseFrame = PoseFrame {
        joints: [[0.0; NUM_COORDS]; NUM_JOINTS],
    };

    pub fn new(joints: [Joint; NUM_JOINTS]) -> Self {
        Self { joints }
    }

    /// Build a frame from a detector's landmark list, which must hold exactly 33 joints.
    pub fn try_from_joints(joints: Vec<Joint>) -> PoseResult<Self> {
        let count = joints.len();
        let joints: [Joint; NUM_JOINTS] = joints
            .try_into()
            .map_err(|_| PoseError::input_shape(EXPECTED_SHAPE, format!("(1, {count}, 3)")))?;
        Ok(Self { joints })
    }

    /// Build a frame from loosely typed nested lists (e.g. decoded JSON).
    pub fn try_from_nested(rows: Vec<Vec<f32>>) -> PoseResult<Self> {
        let joint_count = rows.len();
        let mut joints = Vec::with_capacity(joint_count);
        for row in rows {
            let coord_count = row.len();
            let joint: Joint = row.try_into().map_err(|_| {
                PoseError::input_shape(
                    EXPECTED_SHAPE,
                    format!("(1, {joint_count}, {coord_count})"),
                )
            })?;
            joints.push(joint);
        }
        Self::try_from_joints(joints)
    }

    pub fn joints(&self) -> &[Joint; NUM_JOINTS] {
        &self.joints
    }

    pub fn joints_mut(&mut self) -> &mut [Joint; NUM_JOINTS] {
        &mut self.joints
    }

    /// Whether this frame is the zero-fill for a missed detection.
    pub fn is_zero(&self) -> bool {
        self.joints.iter().flatten().all(|v| *v == 0.0)
    }

    /// Coordinates in joint-major order (`j0.x, j0.y, j0.z, j1.x, ...`).
    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        self.joints.iter().flatten().copied()
    }
}

impl Default for PoseFrame {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<Vec<Joint>> for PoseFrame {
    type Error = PoseError;

    fn try_from(joints: Vec<Joint>) -> Result<Self, Self::Error> {
        Self::try_from_joints(joints)
    }
}

impl From<PoseFrame> for Vec<Joint> {
    fn from(frame: PoseFrame) -> Self {
        frame.joints.to_vec()
    }
}

/// Ordered per-frame joint arrays for one requested frame range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawKeypointSequence {
    frames: Vec<PoseFrame>,
}

impl RawKeypointSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_frames(frames: Vec<PoseFrame>) -> Self {
        Self { frames }
    }

    /// Build a sequence from `frames x joints x coords` nested lists,
    /// rejecting any frame that is not 33 x 3.
    pub fn from_nested(frames: Vec<Vec<Vec<f32>>>) -> PoseResult<Self> {
        let frame_count = frames.len();
        let mut out = Vec::with_capacity(frame_count);
        for (index, rows) in frames.into_iter().enumerate() {
            let frame = PoseFrame::try_from_nested(rows).map_err(|e| match e {
                PoseError::InputShape { expected, actual } => PoseError::InputShape {
                    expected,
                    actual: format!("{} at frame {index} of {frame_count}", actual),
                },
                other => other,
            })?;
            out.push(frame);
        }
        Ok(Self { frames: out })
    }

    /// Load a sequence stored as nested JSON lists.
    pub fn load_json(path: &Path) -> PoseResult<Self> {
        if !path.exists() {
            return Err(PoseError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let nested: Vec<Vec<Vec<f32>>> = serde_json::from_str(&content)?;
        Self::from_nested(nested)
    }

    pub fn save_json(&self, path: &Path) -> PoseResult<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn push(&mut self, frame: PoseFrame) {
        self.frames.push(frame);
    }

    pub fn frames(&self) -> &[PoseFrame] {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut [PoseFrame] {
        &mut self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frames carrying a real detection (not zero-filled).
    pub fn detected_frames(&self) -> usize {
        self.frames.iter().filter(|f| !f.is_zero()).count()
    }
}

impl FromIterator<PoseFrame> for RawKeypointSequence {
    fn from_iter<I: IntoIterator<Item = PoseFrame>>(iter: I) -> Self {
        Self {
            frames: iter.into_iter().collect(),
        }
    }
}
