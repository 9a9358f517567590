//! Ordered class label set.
//!
//! Index `i` of the classifier output always corresponds to label `i`.
//! The set is fixed once loaded.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use yogapose_common::error::{PoseError, PoseResult};

/// Poses the bundled classifier was trained on, in label-encoder order.
pub const DEFAULT_POSES: [&str; 5] = [
    "chair",
    "cobra",
    "downward-dog",
    "happy-baby",
    "standing-big-toe-hold",
];

/// Ordered, non-empty list of pose names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ClassLabelSet {
    labels: Vec<String>,
}

impl ClassLabelSet {
    pub fn new(labels: Vec<String>) -> PoseResult<Self> {
        if labels.is_empty() {
            return Err(PoseError::configuration("label set is empty"));
        }
        Ok(Self { labels })
    }

    pub fn default_poses() -> Self {
        Self {
            labels: DEFAULT_POSES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Load a JSON array of label strings.
    pub fn from_json_file(path: &Path) -> PoseResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let labels: Vec<String> = serde_json::from_str(&content)?;
        Self::new(labels)
    }

    /// Derive the label set from an annotation CSV.
    ///
    /// Uses the `pose` column, or `poses` if there is none. Labels are the
    /// sorted distinct values, the same order a label encoder assigns.
    pub fn from_csv_column(path: &Path) -> PoseResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|e| PoseError::configuration(format!("cannot read {path:?}: {e}")))?;

        let headers = reader
            .headers()
            .map_err(|e| PoseError::configuration(format!("cannot read {path:?}: {e}")))?
            .clone();
        let column = headers
            .iter()
            .position(|h| h.trim() == "pose")
            .or_else(|| headers.iter().position(|h| h.trim() == "poses"))
            .ok_or_else(|| {
                PoseError::configuration(format!("{path:?} has no 'pose' or 'poses' column"))
            })?;

        let mut distinct = BTreeSet::new();
        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(|e| {
                PoseError::configuration(format!("invalid row {} in {path:?}: {e}", row + 1))
            })?;
            if let Some(value) = record.get(column) {
                let value = value.trim();
                if !value.is_empty() {
                    distinct.insert(value.to_string());
                }
            }
        }

        Self::new(distinct.into_iter().collect())
    }

    /// Resolve the label set: JSON file, then annotation CSV (caching the
    /// result as JSON), then the default poses.
    pub fn load(json_path: &Path, csv_path: &Path) -> PoseResult<Self> {
        if json_path.exists() {
            let labels = Self::from_json_file(json_path)?;
            tracing::debug!(path = %json_path.display(), count = labels.len(), "Loaded labels");
            return Ok(labels);
        }

        if csv_path.exists() {
            let labels = Self::from_csv_column(csv_path)?;
            tracing::info!(
                path = %csv_path.display(),
                count = labels.len(),
                "Derived labels from annotations"
            );
            if let Err(e) = labels.save_json(json_path) {
                tracing::warn!("Failed to cache labels at {:?}: {}", json_path, e);
            }
            return Ok(labels);
        }

        tracing::info!("No label files found, using default poses");
        Ok(Self::default_poses())
    }

    pub fn save_json(&self, path: &Path) -> PoseResult<()> {
        let json = serde_json::to_string_pretty(&self.labels)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false; an empty set cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for ClassLabelSet {
    type Error = PoseError;

    fn try_from(labels: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(labels)
    }
}

impl From<ClassLabelSet> for Vec<String> {
    fn from(set: ClassLabelSet) -> Self {
        set.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_rejected() {
        assert!(matches!(
            ClassLabelSet::new(vec![]),
            Err(PoseError::Configuration { .. })
        ));
    }

    #[test]
    fn test_csv_labels_sorted_and_distinct() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("labels2.csv");
        std::fs::write(
            &csv_path,
            "video,frame_start,frame_end,poses\n\
             a.mp4,0,40,cobra\n\
             b.mp4,5,60,chair\n\
             c.mp4,0,30,cobra\n\
             d.mp4,0,30,happy-baby\n",
        )
        .unwrap();

        let labels = ClassLabelSet::from_csv_column(&csv_path).unwrap();
        let names: Vec<&str> = labels.iter().collect();
        assert_eq!(names, vec!["chair", "cobra", "happy-baby"]);
    }

    #[test]
    fn test_csv_prefers_pose_column() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("labels.csv");
        std::fs::write(&csv_path, "poses,pose\nignored,b\nignored,a\n").unwrap();

        let labels = ClassLabelSet::from_csv_column(&csv_path).unwrap();
        assert_eq!(labels.get(0), Some("a"));
        assert_eq!(labels.get(1), Some("b"));
    }

    #[test]
    fn test_csv_without_pose_column() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("labels.csv");
        std::fs::write(&csv_path, "video,label\na.mp4,cobra\n").unwrap();
        assert!(ClassLabelSet::from_csv_column(&csv_path).is_err());
    }

    #[test]
    fn test_load_resolution_order() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("label_classes.json");
        let csv_path = dir.path().join("labels2.csv");

        // Nothing on disk: defaults.
        let labels = ClassLabelSet::load(&json_path, &csv_path).unwrap();
        assert_eq!(labels, ClassLabelSet::default_poses());

        // CSV only: derived and cached as JSON.
        std::fs::write(&csv_path, "pose\nwarrior\ntree\n").unwrap();
        let labels = ClassLabelSet::load(&json_path, &csv_path).unwrap();
        assert_eq!(labels.iter().collect::<Vec<_>>(), vec!["tree", "warrior"]);
        assert!(json_path.exists());

        // JSON wins once present.
        std::fs::write(&json_path, r#"["x", "y", "z"]"#).unwrap();
        let labels = ClassLabelSet::load(&json_path, &csv_path).unwrap();
        assert_eq!(labels.len(), 3);
        assert_eq!(labels.get(2), Some("z"));
    }
}
