//! Configuration for the retention model.
//!
//! The baseline curve, the trigger weight table and the model constants are
//! plain immutable values. A [`RetentionConfig`] is built once (defaults or a
//! TOML file) and shared read-only by every analysis.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReelsimError, Result};
use crate::trigger::Trigger;

/// Default stay probabilities for an untagged 30-second video
pub const DEFAULT_BASELINE: [f64; 30] = [
    0.95, 0.93, 0.88, 0.85, 0.83, 0.83, 0.80, 0.80, 0.82, 0.82, //
    0.78, 0.78, 0.78, 0.80, 0.80, 0.80, 0.80, 0.83, 0.83, 0.83, //
    0.84, 0.84, 0.85, 0.85, 0.86, 0.86, 0.87, 0.88, 0.88, 0.89,
];

/// Upper bound for a single second's stay probability
pub const DEFAULT_STAY_CEILING: f64 = 0.99;

/// Replay score of a video with no loop triggers
pub const DEFAULT_BASE_REPLAY_SCORE: f64 = 0.10;

/// Replay bonus per second carrying the loop trigger
pub const DEFAULT_LOOP_BONUS: f64 = 0.08;

/// Stay probability below which a second counts as a retention risk
pub const DEFAULT_WEAK_THRESHOLD: f64 = 0.80;

/// Impacts at or below this many percentage points are dropped
pub const DEFAULT_IMPACT_NOISE_FLOOR: f64 = 0.01;

/// Default weight table
pub fn default_weights() -> BTreeMap<Trigger, f64> {
    [
        (Trigger::Hook, 0.07),
        (Trigger::Shock, 0.09),
        (Trigger::CuriosityQuestion, 0.05),
        (Trigger::JumpCut, 0.04),
        (Trigger::MusicCue, 0.03),
        (Trigger::TextOverlayBold, 0.02),
        (Trigger::PoignantPov, 0.06),
        (Trigger::LoopHint, 0.10),
        (Trigger::SurpriseReveal, 0.08),
        (Trigger::Context, 0.01),
        (Trigger::Cta, 0.02),
        (Trigger::SoundEffect, 0.035),
        (Trigger::PatternInterrupt, 0.065),
        (Trigger::QuickZoom, 0.025),
        (Trigger::PointOfViewShot, 0.055),
        (Trigger::SatisfyingVisual, 0.045),
        (Trigger::CallbackJoke, 0.05),
        (Trigger::Foreshadowing, 0.03),
        (Trigger::VisualMetaphor, 0.04),
    ]
    .into_iter()
    .collect()
}

/// What the model uses for seconds past the end of the baseline curve
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtrapolationPolicy {
    /// Repeat the last configured entry
    #[default]
    RepeatLast,
    /// Use a fixed stay probability
    Constant(f64),
}

/// Retention model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    /// Per-second stay probabilities, index = second offset
    pub baseline: Vec<f64>,
    /// Clamp ceiling for a single second (default: 0.99)
    pub stay_ceiling: f64,
    /// Replay score before loop bonuses (default: 0.10)
    pub base_replay_score: f64,
    /// Replay bonus per second carrying `loop_trigger` (default: 0.08)
    pub loop_bonus: f64,
    /// Trigger that earns the replay bonus (default: loop_hint)
    pub loop_trigger: Trigger,
    /// Weak-zone line for reporting (default: 0.80)
    pub weak_threshold: f64,
    /// Minimum impact in percentage points worth reporting (default: 0.01)
    pub impact_noise_floor: f64,
    /// Policy past the baseline table
    pub extrapolation: ExtrapolationPolicy,
    /// Probability boost per trigger
    pub weights: BTreeMap<Trigger, f64>,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            baseline: DEFAULT_BASELINE.to_vec(),
            stay_ceiling: DEFAULT_STAY_CEILING,
            base_replay_score: DEFAULT_BASE_REPLAY_SCORE,
            loop_bonus: DEFAULT_LOOP_BONUS,
            loop_trigger: Trigger::LoopHint,
            weak_threshold: DEFAULT_WEAK_THRESHOLD,
            impact_noise_floor: DEFAULT_IMPACT_NOISE_FLOOR,
            extrapolation: ExtrapolationPolicy::RepeatLast,
            weights: default_weights(),
        }
    }
}

impl RetentionConfig {
    /// Default constants with a different baseline curve
    pub fn with_baseline(baseline: impl Into<Vec<f64>>) -> Self {
        Self {
            baseline: baseline.into(),
            ..Self::default()
        }
    }

    /// Weight of a trigger; anything outside the table weighs nothing
    pub fn weight(&self, trigger: &Trigger) -> f64 {
        match trigger {
            Trigger::Unknown(_) => 0.0,
            known => self.weights.get(known).copied().unwrap_or(0.0),
        }
    }

    /// Baseline stay probability at second `t`
    ///
    /// An empty baseline yields 0.0 under `RepeatLast`; [`Self::validate`]
    /// rejects that configuration.
    pub fn baseline_at(&self, t: u32) -> f64 {
        if let Some(&p) = self.baseline.get(t as usize) {
            return p;
        }
        match self.extrapolation {
            ExtrapolationPolicy::RepeatLast => self.baseline.last().copied().unwrap_or(0.0),
            ExtrapolationPolicy::Constant(p) => p,
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.baseline.is_empty() {
            return Err(ReelsimError::InvalidConfig("baseline is empty".into()));
        }
        if let Some((t, p)) = self
            .baseline
            .iter()
            .enumerate()
            .find(|(_, p)| !is_probability(**p))
        {
            return Err(ReelsimError::InvalidConfig(format!(
                "baseline[{t}] = {p} is outside [0, 1]"
            )));
        }
        for (trigger, weight) in &self.weights {
            if !trigger.is_known() {
                return Err(ReelsimError::InvalidConfig(format!(
                    "unrecognized trigger in weight table: {trigger}"
                )));
            }
            if !weight.is_finite() || *weight < 0.0 {
                return Err(ReelsimError::InvalidConfig(format!(
                    "weight for {trigger} must be a non-negative number, got {weight}"
                )));
            }
        }
        if !(self.stay_ceiling > 0.0 && self.stay_ceiling <= 1.0) {
            return Err(ReelsimError::InvalidConfig(format!(
                "stay_ceiling {} is outside (0, 1]",
                self.stay_ceiling
            )));
        }
        for (name, value) in [
            ("base_replay_score", self.base_replay_score),
            ("loop_bonus", self.loop_bonus),
            ("weak_threshold", self.weak_threshold),
        ] {
            if !is_probability(value) {
                return Err(ReelsimError::InvalidConfig(format!(
                    "{name} {value} is outside [0, 1]"
                )));
            }
        }
        if !self.impact_noise_floor.is_finite() || self.impact_noise_floor < 0.0 {
            return Err(ReelsimError::InvalidConfig(format!(
                "impact_noise_floor {} must be non-negative",
                self.impact_noise_floor
            )));
        }
        if let ExtrapolationPolicy::Constant(p) = self.extrapolation
            && !is_probability(p)
        {
            return Err(ReelsimError::InvalidConfig(format!(
                "extrapolation constant {p} is outside [0, 1]"
            )));
        }
        Ok(())
    }

    /// Parse and validate a TOML document; missing fields take defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

fn is_probability(p: f64) -> bool {
    (0.0..=1.0).contains(&p)
}
