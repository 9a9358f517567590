//! Report model and label state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use yogapose_classifier::InferenceContext;
use yogapose_common::config::AppConfig;
use yogapose_keypoint_extractor::{DefaultVideoBackend, VideoBackend};

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub model_loaded: bool,
    pub classes_loaded: bool,
    pub num_classes: usize,
    pub device: &'static str,
    pub video_backend: &'static str,
    pub detector_found: bool,
    pub checked_at: DateTime<Utc>,
}

impl HealthReport {
    pub fn collect(config: &AppConfig, ctx: &InferenceContext) -> Self {
        Self {
            status: "healthy",
            model_loaded: ctx.model().is_some(),
            classes_loaded: ctx.labels().is_some(),
            num_classes: ctx.labels().map(|l| l.len()).unwrap_or(0),
            device: "cpu",
            video_backend: DefaultVideoBackend.name(),
            detector_found: config.detector.model_path.exists(),
            checked_at: Utc::now(),
        }
    }
}

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    let ctx = InferenceContext::load(config);
    super::print_json(&HealthReport::collect(config, &ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use yogapose_processing_core::SequenceNormalizer;

    #[test]
    fn test_health_of_unloaded_context() {
        let ctx = InferenceContext::unloaded(SequenceNormalizer::default());
        let report = HealthReport::collect(&AppConfig::default(), &ctx);
        assert_eq!(report.status, "healthy");
        assert!(!report.model_loaded);
        assert!(!report.classes_loaded);
        assert_eq!(report.num_classes, 0);

        let json = serde_json::to_value(&report).unwrap();
        for key in ["status", "model_loaded", "classes_loaded", "device", "checked_at"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
