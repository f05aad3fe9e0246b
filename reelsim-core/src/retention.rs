//! Per-second retention model
//!
//! A memoryless multiplicative survival model: each second gets a stay
//! probability from the baseline curve plus the weights of the triggers
//! active at that second, and the finish rate is the product of all of them.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RetentionConfig;
use crate::timeline::TimelineEvent;
use crate::trigger::Trigger;

/// Output of a retention analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionResult {
    /// Stay probability per second, length == duration
    #[serde(rename = "predicted_P_stay")]
    pub predicted_p_stay: Vec<f64>,
    /// Product of all stay probabilities
    pub predicted_finish_rate: f64,
    /// Heuristic rewatch likelihood in [0, 1]
    pub predicted_replay_score: f64,
}

impl RetentionResult {
    /// Seconds whose stay probability is strictly below `threshold`
    pub fn weak_seconds(&self, threshold: f64) -> Vec<u32> {
        self.predicted_p_stay
            .iter()
            .enumerate()
            .filter(|(_, p)| **p < threshold)
            .map(|(t, _)| t as u32)
            .collect()
    }

    pub fn duration(&self) -> u32 {
        self.predicted_p_stay.len() as u32
    }
}

/// Anything that can score a timeline
///
/// The impact analyzer is generic over this so alternate models can be
/// swapped in.
pub trait RetentionEstimator: Send + Sync {
    /// Score `timeline` over `duration` seconds. Must not fail.
    fn analyze(&self, timeline: &[TimelineEvent], duration: u32) -> RetentionResult;
}

/// Baseline-plus-weights retention model
#[derive(Debug, Clone, Default)]
pub struct RetentionModel {
    config: RetentionConfig,
}

impl RetentionModel {
    /// Create with the default curve and weights
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration
    pub fn with_config(config: RetentionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RetentionConfig {
        &self.config
    }

    /// Triggers active at second `t`, each counted once regardless of how
    /// many overlapping events carry it
    pub fn active_triggers<'a>(timeline: &'a [TimelineEvent], t: u32) -> Vec<&'a Trigger> {
        let mut active: Vec<&Trigger> = Vec::new();
        for event in timeline.iter().filter(|e| e.is_active_at(t)) {
            for trigger in &event.triggers {
                if !active.contains(&trigger) {
                    active.push(trigger);
                }
            }
        }
        active
    }

    /// Stay probability for one second given its deduplicated triggers
    ///
    /// Total even for an unvalidated negative or NaN ceiling.
    fn stay_probability(&self, t: u32, active: &[&Trigger]) -> f64 {
        let base = self.config.baseline_at(t);
        let modifier: f64 = active.iter().map(|trigger| self.config.weight(trigger)).sum();
        (base + modifier).min(self.config.stay_ceiling).max(0.0)
    }
}

impl RetentionEstimator for RetentionModel {
    fn analyze(&self, timeline: &[TimelineEvent], duration: u32) -> RetentionResult {
        let mut predicted_p_stay = Vec::with_capacity(duration as usize);
        let mut loop_bonus = 0.0;

        for t in 0..duration {
            let active = Self::active_triggers(timeline, t);
            predicted_p_stay.push(self.stay_probability(t, &active));

            if active.contains(&&self.config.loop_trigger) {
                loop_bonus += self.config.loop_bonus;
            }
        }

        let predicted_finish_rate: f64 = predicted_p_stay.iter().product();
        let predicted_replay_score = (self.config.base_replay_score + loop_bonus).clamp(0.0, 1.0);

        debug!(
            duration,
            events = timeline.len(),
            finish_rate = predicted_finish_rate,
            replay_score = predicted_replay_score,
            "retention analyzed"
        );

        RetentionResult {
            predicted_p_stay,
            predicted_finish_rate,
            predicted_replay_score,
        }
    }
}

/// Score a timeline with the given configuration
pub fn analyze_retention(
    config: &RetentionConfig,
    timeline: &[TimelineEvent],
    duration: u32,
) -> RetentionResult {
    RetentionModel::with_config(config.clone()).analyze(timeline, duration)
}
