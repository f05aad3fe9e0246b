use std::collections::BTreeMap;

use reelsim_core::{ExtrapolationPolicy, RetentionConfig, Trigger};
use serde::{Deserialize, Serialize};

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawReelsimConfig {
    #[serde(default)]
    pub model: RawModelConfig,

    #[serde(default)]
    pub output: RawOutputConfig,
}

/// Model config as stored in TOML (optional fields for proper merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawModelConfig {
    pub baseline: Option<Vec<f64>>,
    pub stay_ceiling: Option<f64>,
    pub base_replay_score: Option<f64>,
    pub loop_bonus: Option<f64>,
    pub loop_trigger: Option<Trigger>,
    pub weak_threshold: Option<f64>,
    pub impact_noise_floor: Option<f64>,
    pub extrapolation: Option<ExtrapolationPolicy>,

    /// Per-trigger overrides, merged key by key over the defaults
    #[serde(default)]
    pub weights: BTreeMap<Trigger, f64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawOutputConfig {
    /// Decimal places for percentages
    pub precision: Option<usize>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReelsimConfig {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub model: RetentionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Decimal places for percentages
    pub precision: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }
}

/// Default number of decimals in reports
pub const DEFAULT_PRECISION: usize = 2;
