//! Counterfactual trigger impact analysis
//!
//! Each distinct trigger in a timeline is removed in turn and the timeline is
//! re-scored. The drop in finish rate, in percentage points, is that
//! trigger's impact.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{DEFAULT_IMPACT_NOISE_FLOOR, RetentionConfig};
use crate::retention::{RetentionEstimator, RetentionModel};
use crate::timeline::TimelineEvent;
use crate::trigger::Trigger;

/// Marginal contribution of one trigger to the finish rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerImpact {
    pub trigger: Trigger,
    /// Percentage points of finish rate lost when the trigger is removed
    pub impact: f64,
}

/// Distinct triggers across the whole timeline in first-discovery order
///
/// This is a global inventory, unrelated to the per-second dedup the
/// retention model performs.
pub fn trigger_inventory(timeline: &[TimelineEvent]) -> Vec<Trigger> {
    let mut inventory: Vec<Trigger> = Vec::new();
    for trigger in timeline.iter().flat_map(|event| event.triggers.iter()) {
        if !inventory.contains(trigger) {
            inventory.push(trigger.clone());
        }
    }
    inventory
}

/// Timeline with `trigger` stripped from every event
pub fn counterfactual_timeline(
    timeline: &[TimelineEvent],
    trigger: &Trigger,
) -> Vec<TimelineEvent> {
    timeline
        .iter()
        .map(|event| event.without_trigger(trigger))
        .collect()
}

/// Ranks triggers by how much finish rate they are responsible for
pub struct TriggerImpactAnalyzer<E: RetentionEstimator = RetentionModel> {
    estimator: E,
    noise_floor: f64,
}

impl TriggerImpactAnalyzer<RetentionModel> {
    /// Analyzer over the default retention model
    pub fn new() -> Self {
        Self::with_estimator(RetentionModel::new(), DEFAULT_IMPACT_NOISE_FLOOR)
    }

    /// Analyzer over a retention model built from `config`
    pub fn from_config(config: RetentionConfig) -> Self {
        let noise_floor = config.impact_noise_floor;
        Self::with_estimator(RetentionModel::with_config(config), noise_floor)
    }
}

impl Default for TriggerImpactAnalyzer<RetentionModel> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: RetentionEstimator> TriggerImpactAnalyzer<E> {
    pub fn with_estimator(estimator: E, noise_floor: f64) -> Self {
        Self {
            estimator,
            noise_floor,
        }
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    /// Impact of every trigger above the noise floor, highest first
    ///
    /// Counterfactuals are scored in parallel. Ties keep first-discovery
    /// order.
    pub fn analyze(&self, timeline: &[TimelineEvent], duration: u32) -> Vec<TriggerImpact> {
        let inventory = trigger_inventory(timeline);
        if inventory.is_empty() {
            return Vec::new();
        }

        let baseline = self
            .estimator
            .analyze(timeline, duration)
            .predicted_finish_rate;

        let measured: Vec<TriggerImpact> = inventory
            .into_par_iter()
            .map(|trigger| {
                let counterfactual = counterfactual_timeline(timeline, &trigger);
                let without = self
                    .estimator
                    .analyze(&counterfactual, duration)
                    .predicted_finish_rate;
                TriggerImpact {
                    trigger,
                    impact: (baseline - without) * 100.0,
                }
            })
            .collect();

        let evaluated = measured.len();
        let mut impacts: Vec<TriggerImpact> = measured
            .into_iter()
            .filter(|i| i.impact > self.noise_floor)
            .collect();
        impacts.sort_by(|a, b| b.impact.total_cmp(&a.impact));

        debug!(
            duration,
            evaluated,
            kept = impacts.len(),
            baseline_finish_rate = baseline,
            "trigger impact analyzed"
        );

        impacts
    }
}

/// Rank trigger impacts with the given configuration
pub fn analyze_trigger_impact(
    config: &RetentionConfig,
    timeline: &[TimelineEvent],
    duration: u32,
) -> Vec<TriggerImpact> {
    TriggerImpactAnalyzer::from_config(config.clone()).analyze(timeline, duration)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::retention::RetentionResult;

    const EPS: f64 = 1e-9;

    fn event(start: u32, end: u32, triggers: &[Trigger]) -> TimelineEvent {
        TimelineEvent::new(start, end, triggers.to_vec())
    }

    fn flat_analyzer(p: f64) -> TriggerImpactAnalyzer {
        TriggerImpactAnalyzer::from_config(RetentionConfig::with_baseline(vec![p]))
    }

    /// Counts invocations and scores by the number of applied triggers
    struct CountingEstimator {
        calls: AtomicUsize,
    }

    impl RetentionEstimator for CountingEstimator {
        fn analyze(&self, timeline: &[TimelineEvent], duration: u32) -> RetentionResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let tags: usize = timeline.iter().map(|e| e.triggers.len()).sum();
            RetentionResult {
                predicted_p_stay: vec![0.5; duration as usize],
                predicted_finish_rate: 0.5 + tags as f64 * 0.01,
                predicted_replay_score: 0.1,
            }
        }
    }

    #[test]
    fn test_empty_timeline_has_no_impacts() {
        assert!(TriggerImpactAnalyzer::new().analyze(&[], 10).is_empty());
        assert!(
            TriggerImpactAnalyzer::new()
                .analyze(&[event(0, 5, &[])], 5)
                .is_empty()
        );
    }

    #[test]
    fn test_inventory_is_global_and_ordered() {
        let timeline = [
            event(0, 2, &[Trigger::Hook, Trigger::Shock]),
            event(1, 3, &[Trigger::Shock, Trigger::Cta]),
            event(10, 12, &[Trigger::Hook]),
        ];
        assert_eq!(
            trigger_inventory(&timeline),
            vec![Trigger::Hook, Trigger::Shock, Trigger::Cta]
        );
    }

    #[test]
    fn test_single_trigger_impact() {
        let analyzer = flat_analyzer(0.80);
        let impacts = analyzer.analyze(&[event(0, 2, &[Trigger::Hook])], 2);

        assert_eq!(impacts.len(), 1);
        assert_eq!(impacts[0].trigger, Trigger::Hook);
        // 0.87^2 - 0.80^2 = 0.1169
        assert!((impacts[0].impact - 11.69).abs() < 1e-6);
    }

    #[test]
    fn test_impacts_sorted_descending() {
        let analyzer = flat_analyzer(0.70);
        let timeline = [
            event(0, 1, &[Trigger::Cta]),
            event(1, 2, &[Trigger::Shock]),
            event(2, 3, &[Trigger::Hook]),
        ];
        let impacts = analyzer.analyze(&timeline, 3);
        let order: Vec<Trigger> = impacts.iter().map(|i| i.trigger.clone()).collect();
        assert_eq!(order, vec![Trigger::Shock, Trigger::Hook, Trigger::Cta]);
        assert!(impacts.windows(2).all(|w| w[0].impact >= w[1].impact));
    }

    #[test]
    fn test_ties_keep_discovery_order() {
        let analyzer = flat_analyzer(0.70);
        // Same weight (0.05) at the same baseline
        let timeline = [
            event(0, 1, &[Trigger::CallbackJoke]),
            event(1, 2, &[Trigger::CuriosityQuestion]),
        ];
        let impacts = analyzer.analyze(&timeline, 2);
        assert_eq!(impacts.len(), 2);
        assert!((impacts[0].impact - impacts[1].impact).abs() < EPS);
        assert_eq!(impacts[0].trigger, Trigger::CallbackJoke);
        assert_eq!(impacts[1].trigger, Trigger::CuriosityQuestion);

        let reversed = [timeline[1].clone(), timeline[0].clone()];
        let impacts = analyzer.analyze(&reversed, 2);
        assert_eq!(impacts[0].trigger, Trigger::CuriosityQuestion);
    }

    #[test]
    fn test_unknown_trigger_is_filtered_as_noise() {
        let analyzer = TriggerImpactAnalyzer::new();
        let impacts = analyzer.analyze(&[event(0, 5, &[Trigger::from("lens_flare")])], 5);
        assert!(impacts.is_empty());
    }

    #[test]
    fn test_saturated_trigger_is_filtered() {
        // Baseline already at the ceiling: removing the hook changes nothing
        let analyzer = flat_analyzer(0.99);
        let impacts = analyzer.analyze(&[event(0, 3, &[Trigger::Hook])], 3);
        assert!(impacts.is_empty());
    }

    #[test]
    fn test_trigger_outside_duration_is_filtered() {
        let analyzer = TriggerImpactAnalyzer::new();
        let impacts = analyzer.analyze(&[event(40, 45, &[Trigger::Shock])], 20);
        assert!(impacts.is_empty());
    }

    #[test]
    fn test_results_only_contain_input_triggers() {
        let analyzer = TriggerImpactAnalyzer::new();
        let timeline = [
            event(0, 3, &[Trigger::Hook, Trigger::QuickZoom]),
            event(3, 8, &[Trigger::MusicCue]),
            event(8, 10, &[Trigger::LoopHint, Trigger::Context]),
        ];
        let inventory = trigger_inventory(&timeline);
        for impact in analyzer.analyze(&timeline, 10) {
            assert!(inventory.contains(&impact.trigger));
            assert!(impact.impact > DEFAULT_IMPACT_NOISE_FLOOR);
        }
    }

    #[test]
    fn test_counterfactual_leaves_input_untouched() {
        let timeline = vec![
            TimelineEvent {
                suggested_triggers: Some(vec![Trigger::JumpCut]),
                is_weak: Some(true),
                ..event(0, 3, &[Trigger::Hook, Trigger::Shock])
            },
            event(3, 5, &[Trigger::Hook]),
        ];
        let snapshot = timeline.clone();

        let counterfactual = counterfactual_timeline(&timeline, &Trigger::Hook);
        assert_eq!(counterfactual[0].triggers, vec![Trigger::Shock]);
        assert!(counterfactual[1].triggers.is_empty());
        assert_eq!(counterfactual[0].suggested_triggers, snapshot[0].suggested_triggers);
        assert_eq!(counterfactual[0].is_weak, Some(true));

        TriggerImpactAnalyzer::new().analyze(&timeline, 5);
        assert_eq!(timeline, snapshot);
    }

    #[test]
    fn test_estimator_called_once_per_trigger_plus_baseline() {
        let analyzer = TriggerImpactAnalyzer::with_estimator(
            CountingEstimator {
                calls: AtomicUsize::new(0),
            },
            0.01,
        );
        let timeline = [
            event(0, 2, &[Trigger::Hook, Trigger::Shock]),
            event(2, 4, &[Trigger::Hook, Trigger::Cta]),
        ];
        let impacts = analyzer.analyze(&timeline, 4);

        assert_eq!(analyzer.estimator().calls.load(Ordering::SeqCst), 4);
        // Hook is tagged twice, so removing it costs two points
        assert_eq!(impacts[0].trigger, Trigger::Hook);
        assert!((impacts[0].impact - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_noise_floor_from_config() {
        let config = RetentionConfig {
            impact_noise_floor: 50.0,
            ..RetentionConfig::with_baseline(vec![0.8])
        };
        let impacts = analyze_trigger_impact(&config, &[event(0, 2, &[Trigger::Hook])], 2);
        assert!(impacts.is_empty());
    }
}
