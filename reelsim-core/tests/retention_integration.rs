//! Integration tests for the retention pipeline
//!
//! Runs the bundled sample scripts and hand-built timelines through
//! ingestion, the retention model and the trigger impact analyzer.

use reelsim_core::{
    RetentionConfig, RetentionEstimator, RetentionModel, SampleScripts, ScriptAnalyzer,
    ScriptSource, ScriptVariant, TimelineEvent, Trigger, TriggerImpactAnalyzer,
    analyze_retention, analyze_trigger_impact, render_markdown, trigger_inventory,
};

// =============================================================================
// Test Helpers
// =============================================================================

const EPS: f64 = 1e-9;

fn samples() -> Vec<ScriptVariant> {
    SampleScripts.load_variants().expect("bundled samples parse")
}

fn event(start: u32, end: u32, triggers: &[Trigger]) -> TimelineEvent {
    TimelineEvent::new(start, end, triggers.to_vec())
}

// =============================================================================
// Reference scenarios
// =============================================================================

#[test]
fn hook_on_high_baseline_clamps_to_ceiling() {
    let config = RetentionConfig::with_baseline(vec![0.95]);
    let result = analyze_retention(&config, &[event(0, 1, &[Trigger::Hook])], 1);
    assert_eq!(result.predicted_p_stay, vec![0.99]);
    assert_eq!(result.predicted_finish_rate, 0.99);
}

#[test]
fn overlapping_hooks_count_once_per_second() {
    let config = RetentionConfig::with_baseline(vec![0.80, 0.80]);
    let timeline = [event(0, 1, &[Trigger::Hook]), event(0, 2, &[Trigger::Hook])];
    let result = analyze_retention(&config, &timeline, 2);
    assert!((result.predicted_p_stay[0] - 0.87).abs() < EPS);
    assert!((result.predicted_p_stay[1] - 0.87).abs() < EPS);
    assert!((result.predicted_finish_rate - 0.7569).abs() < EPS);
}

#[test]
fn loop_hint_at_two_seconds_scores_replay() {
    let timeline = [event(4, 5, &[Trigger::LoopHint]), event(9, 10, &[Trigger::LoopHint])];
    let result = RetentionModel::new().analyze(&timeline, 12);
    assert!((result.predicted_replay_score - 0.26).abs() < EPS);
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn empty_timeline_matches_baseline_product_for_every_duration() {
    let model = RetentionModel::new();
    for duration in 0..40u32 {
        let result = model.analyze(&[], duration);
        assert_eq!(result.predicted_p_stay.len(), duration as usize);
        let mut product = 1.0;
        for (t, p) in result.predicted_p_stay.iter().enumerate() {
            assert_eq!(*p, model.config().baseline_at(t as u32));
            product *= p;
        }
        assert!((result.predicted_finish_rate - product).abs() < EPS);
        assert!(result.predicted_finish_rate > 0.0 && result.predicted_finish_rate <= 1.0);
    }
}

#[test]
fn finish_rate_drops_when_one_second_drops() {
    let model = RetentionModel::new();
    let strong = model.analyze(&[event(5, 6, &[Trigger::Shock])], 10);
    let weak = model.analyze(&[event(5, 6, &[Trigger::Cta])], 10);
    assert!(weak.predicted_p_stay[5] < strong.predicted_p_stay[5]);
    assert!(weak.predicted_finish_rate < strong.predicted_finish_rate);
}

#[test]
fn impact_results_stay_within_inventory() {
    for variant in samples() {
        let inventory = trigger_inventory(&variant.timeline);
        let impacts = TriggerImpactAnalyzer::new().analyze(&variant.timeline, variant.duration_s);
        for impact in &impacts {
            assert!(inventory.contains(&impact.trigger));
            assert!(impact.impact > 0.01);
        }
        assert!(impacts.windows(2).all(|w| w[0].impact >= w[1].impact));
    }
}

#[test]
fn analysis_is_repeatable() {
    let config = RetentionConfig::default();
    for variant in samples() {
        let a = analyze_trigger_impact(&config, &variant.timeline, variant.duration_s);
        let b = analyze_trigger_impact(&config, &variant.timeline, variant.duration_s);
        assert_eq!(a, b);
    }
}

// =============================================================================
// Sample scripts
// =============================================================================

#[test]
fn first_sample_script_scores() {
    let variant = &samples()[0];
    let analysis = ScriptAnalyzer::default().analyze(variant).unwrap();

    assert!((analysis.retention.predicted_finish_rate - 0.081_182_920_745_733_9).abs() < 1e-9);
    // loop_hint covers seconds 17, 18 and 19
    assert!((analysis.retention.predicted_replay_score - 0.34).abs() < EPS);
    assert_eq!(analysis.weak_seconds, vec![11, 12]);

    let ranked: Vec<Trigger> = analysis
        .trigger_impact
        .iter()
        .map(|i| i.trigger.clone())
        .collect();
    assert_eq!(
        ranked,
        vec![
            Trigger::LoopHint,
            Trigger::SurpriseReveal,
            Trigger::PoignantPov,
            Trigger::JumpCut,
            Trigger::MusicCue,
            Trigger::CuriosityQuestion,
            Trigger::Cta,
            Trigger::Context,
        ]
    );
    assert!((analysis.trigger_impact[0].impact - 2.303_279_833).abs() < 1e-6);
    // Hook and shock share second 0, which sits at the ceiling either way
    assert!(!ranked.contains(&Trigger::Hook));
    assert!(!ranked.contains(&Trigger::Shock));
}

#[test]
fn second_sample_script_scores() {
    let variant = &samples()[1];
    let analysis = ScriptAnalyzer::default().analyze(variant).unwrap();

    assert!((analysis.retention.predicted_finish_rate - 0.058_599_354_573_974_55).abs() < 1e-9);
    assert!((analysis.retention.predicted_replay_score - 0.10).abs() < EPS);
    assert!(analysis.weak_seconds.is_empty());
    assert_eq!(analysis.trigger_impact.len(), 9);
    assert_eq!(analysis.trigger_impact[0].trigger, Trigger::SurpriseReveal);
    assert_eq!(analysis.trigger_impact[8].trigger, Trigger::Context);
}

#[test]
fn applying_a_suggestion_raises_finish_rate() {
    let variant = &samples()[0];
    let analyzer = ScriptAnalyzer::default();
    let before = analyzer.analyze(variant).unwrap();

    // Event 2 (3s-5s) has no triggers and suggests a jump cut
    let edited = variant
        .with_suggestion_applied(2, &Trigger::JumpCut)
        .unwrap();
    let after = analyzer.analyze(&edited).unwrap();

    assert!(after.retention.predicted_finish_rate > before.retention.predicted_finish_rate);
    assert!(!edited.timeline[2].suggestions().contains(&Trigger::JumpCut));
    assert!(variant.timeline[2].triggers.is_empty());
}

#[test]
fn sample_scripts_export_to_markdown() {
    let analyzer = ScriptAnalyzer::default();
    for (index, variant) in samples().iter().enumerate() {
        let analysis = analyzer.analyze(variant).unwrap();
        let md = render_markdown(index, variant, &analysis.retention, &analysis.trigger_impact);
        assert!(md.starts_with(&format!("# Script Variant {}", index + 1)));
        assert_eq!(md.matches("\n---\n").count(), variant.timeline.len());
    }
}
