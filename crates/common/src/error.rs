//! Error types shared across YogaPose crates.

use std::path::PathBuf;

/// Top-level error type for YogaPose operations.
#[derive(Debug, thiserror::Error)]
pub enum PoseError {
    /// Classifier or label set missing or inconsistent.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A keypoint frame or sequence does not have the expected shape.
    #[error("Invalid shape: {actual}. Expected {expected}")]
    InputShape { expected: String, actual: String },

    /// Video decoding or pose detection handle failure.
    #[error("Extraction error: {message}")]
    Extraction { message: String },

    /// Failure during tensor construction or the forward pass.
    #[error("Prediction error: {message}")]
    Inference { message: String },

    /// Invalid upload or frame bounds.
    #[error("Invalid request: {message}")]
    Request { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using PoseError.
pub type PoseResult<T> = Result<T, PoseError>;

impl PoseError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration {
            message: msg.into(),
        }
    }

    pub fn input_shape(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::InputShape {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction {
            message: msg.into(),
        }
    }

    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference {
            message: msg.into(),
        }
    }

    pub fn request(msg: impl Into<String>) -> Self {
        Self::Request {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }

    /// HTTP-level status a response carrying this error should report.
    ///
    /// Problems with what the caller sent are 400; everything else is 500.
    pub fn status_code(&self) -> u16 {
        match self {
            PoseError::Request { .. }
            | PoseError::InputShape { .. }
            | PoseError::FileNotFound { .. } => 400,
            _ => 500,
        }
    }
}
