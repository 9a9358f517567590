//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PoseError, PoseResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Sequence classifier and label set.
    pub model: ModelConfig,

    /// Pose landmark detector.
    pub detector: DetectorConfig,

    /// Preprocessing between extraction and inference.
    pub pipeline: PipelineConfig,

    /// Upload constraints enforced before any extraction.
    pub request: RequestLimits,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Where the classifier and its labels come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// ONNX export of the sequence classifier.
    pub model_path: PathBuf,

    /// Ordered label set as a JSON array of strings.
    pub labels_path: PathBuf,

    /// Annotation CSV used to derive the label set when `labels_path` is absent.
    pub labels_csv: PathBuf,

    /// Intra-op threads for the inference session.
    pub intra_threads: usize,
}

/// Pose landmark detector settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// ONNX landmark model.
    pub model_path: PathBuf,

    /// Square input edge in pixels.
    pub input_size: u32,

    /// Output holding world landmarks, flattened `(joints * 3)` or more.
    pub world_landmarks_output: String,

    /// Output holding the pose presence score.
    pub presence_output: String,

    /// Presence score below which a frame counts as "no detection".
    pub min_detection_confidence: f32,
}

/// Temporal smoothing applied to keypoints before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SmoothingConfig {
    /// Frames are used exactly as detected.
    #[default]
    None,
    Ema {
        strength: f32,
    },
    MovingAverage {
        window: usize,
    },
    Kalman {
        strength: f32,
    },
}

/// How the normalizer standardizes the fixed-length tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Standardization {
    /// One scalar mean and std over the whole tensor.
    #[default]
    Global,
    /// Mean and std per channel over time.
    PerChannel,
}

/// Preprocessing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub smoothing: SmoothingConfig,
    pub standardization: Standardization,
}

/// Constraints on incoming video uploads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestLimits {
    /// Lowercase extensions without the dot.
    pub allowed_extensions: Vec<String>,

    /// Maximum accepted payload size.
    pub max_upload_bytes: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "yogapose=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("cnnbigru_model.onnx"),
            labels_path: PathBuf::from("label_classes.json"),
            labels_csv: PathBuf::from("labels2.csv"),
            intra_threads: 1,
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("pose_landmark_full.onnx"),
            input_size: 256,
            world_landmarks_output: "Identity_4".to_string(),
            presence_output: "Identity_1".to_string(),
            min_detection_confidence: 0.5,
        }
    }
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self {
            allowed_extensions: vec!["mp4".to_string()],
            max_upload_bytes: 500 * 1024 * 1024,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit file. Errors are returned, not swallowed.
    pub fn load_from(path: &Path) -> PoseResult<Self> {
        if !path.exists() {
            return Err(PoseError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("yogapose").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "pipeline": { "smoothing": { "kind": "ema", "strength": 0.4 } } }"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(
            config.pipeline.smoothing,
            SmoothingConfig::Ema { strength: 0.4 }
        );
        assert_eq!(config.pipeline.standardization, Standardization::Global);
        assert_eq!(config.request.allowed_extensions, vec!["mp4".to_string()]);
        assert_eq!(config.detector.input_size, 256);
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load_from(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, PoseError::FileNotFound { .. }));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(PoseError::Json(_))
        ));
    }
}
