//! One-stop analysis of a script variant
//!
//! Validates the variant at the ingestion boundary, then runs the retention
//! model and the trigger impact analyzer over it.

use serde::{Deserialize, Serialize};

use crate::config::RetentionConfig;
use crate::error::Result;
use crate::impact::{TriggerImpact, TriggerImpactAnalyzer};
use crate::ingest::{ValidationWarning, validate_variant};
use crate::retention::{RetentionEstimator, RetentionModel, RetentionResult};
use crate::timeline::ScriptVariant;

/// Everything computed for one variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptAnalysis {
    pub variant_id: String,
    pub duration_s: u32,
    pub retention: RetentionResult,
    /// Seconds below the configured weak threshold
    pub weak_seconds: Vec<u32>,
    pub trigger_impact: Vec<TriggerImpact>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Validates and analyzes script variants against one configuration
pub struct ScriptAnalyzer {
    impact: TriggerImpactAnalyzer<RetentionModel>,
}

impl ScriptAnalyzer {
    pub fn new(config: RetentionConfig) -> Self {
        Self {
            impact: TriggerImpactAnalyzer::from_config(config),
        }
    }

    pub fn config(&self) -> &RetentionConfig {
        self.impact.estimator().config()
    }

    pub fn model(&self) -> &RetentionModel {
        self.impact.estimator()
    }

    /// Validate, then score `variant` over its own duration
    pub fn analyze(&self, variant: &ScriptVariant) -> Result<ScriptAnalysis> {
        let report = validate_variant(variant, self.config())?;

        let retention = self.model().analyze(&variant.timeline, variant.duration_s);
        let trigger_impact = self.impact.analyze(&variant.timeline, variant.duration_s);
        let weak_seconds = retention.weak_seconds(self.config().weak_threshold);

        Ok(ScriptAnalysis {
            variant_id: variant.variant_id.clone(),
            duration_s: variant.duration_s,
            retention,
            weak_seconds,
            trigger_impact,
            warnings: report
                .warnings
                .iter()
                .map(ValidationWarning::to_string)
                .collect(),
        })
    }
}

impl Default for ScriptAnalyzer {
    fn default() -> Self {
        Self::new(RetentionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReelsimError;
    use crate::timeline::TimelineEvent;
    use crate::trigger::Trigger;

    #[test]
    fn test_analyze_combines_model_and_impacts() {
        let analyzer = ScriptAnalyzer::new(RetentionConfig::with_baseline(vec![0.75]));
        let variant = ScriptVariant::new(
            "v1",
            4,
            vec![
                TimelineEvent::new(0, 2, vec![Trigger::Hook]),
                TimelineEvent::new(2, 4, vec![Trigger::LoopHint]),
            ],
        );

        let analysis = analyzer.analyze(&variant).unwrap();

        assert_eq!(analysis.variant_id, "v1");
        assert_eq!(analysis.retention.predicted_p_stay.len(), 4);
        assert!(analysis.weak_seconds.is_empty());
        assert_eq!(analysis.trigger_impact[0].trigger, Trigger::LoopHint);
        assert_eq!(analysis.trigger_impact.len(), 2);
        assert!(analysis.warnings.is_empty());
    }

    #[test]
    fn test_analyze_reports_weak_seconds() {
        let analyzer = ScriptAnalyzer::new(RetentionConfig::with_baseline(vec![0.70]));
        let variant = ScriptVariant::new(
            "v1",
            3,
            vec![TimelineEvent::new(1, 2, vec![Trigger::Shock, Trigger::Hook])],
        );
        let analysis = analyzer.analyze(&variant).unwrap();
        assert_eq!(analysis.weak_seconds, vec![0, 2]);
    }

    #[test]
    fn test_analyze_rejects_invalid_interval() {
        let analyzer = ScriptAnalyzer::default();
        let variant = ScriptVariant::new("v1", 3, vec![TimelineEvent::new(2, 1, vec![])]);
        assert!(matches!(
            analyzer.analyze(&variant),
            Err(ReelsimError::InvalidInterval { .. })
        ));
    }

    #[test]
    fn test_analyze_carries_warnings() {
        let analyzer = ScriptAnalyzer::default();
        let variant = ScriptVariant::new(
            "v1",
            3,
            vec![TimelineEvent::new(0, 3, vec![Trigger::from("lens_flare")])],
        );
        let analysis = analyzer.analyze(&variant).unwrap();
        assert_eq!(analysis.warnings.len(), 1);
        assert!(analysis.warnings[0].contains("lens_flare"));
    }
}
