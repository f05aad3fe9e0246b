use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use reelsim_core::RetentionConfig;
use tracing::debug;

use super::types::{
    DEFAULT_PRECISION, OutputConfig, RawModelConfig, RawOutputConfig, RawReelsimConfig,
    ReelsimConfig,
};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (defaults <- user <- project <- explicit)
    pub fn load(explicit: Option<&Path>) -> Result<ReelsimConfig> {
        let mut raw = RawReelsimConfig::default();

        // Layer 1: User config
        if let Some(user_path) = Self::user_config_path()
            && user_path.exists()
        {
            raw = Self::merge_raw(raw, Self::read_raw(&user_path)?);
        }

        // Layer 2: Project config
        let project_path = Self::project_config_path();
        if project_path.exists() {
            raw = Self::merge_raw(raw, Self::read_raw(&project_path)?);
        }

        // Layer 3: --config
        if let Some(path) = explicit {
            raw = Self::merge_raw(raw, Self::read_raw(path)?);
        }

        Self::finalize(raw)
    }

    fn read_raw(path: &Path) -> Result<RawReelsimConfig> {
        debug!(path = %path.display(), "reading config layer");
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Get user config path
    ///
    /// `$XDG_CONFIG_HOME/reelsim/config.toml` if set, otherwise
    /// `~/.config/reelsim/config.toml`.
    pub fn user_config_path() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            Some(PathBuf::from(xdg_config).join("reelsim/config.toml"))
        } else {
            dirs::home_dir().map(|home| home.join(".config/reelsim/config.toml"))
        }
    }

    /// Get project config path
    /// Can be overridden with REELSIM_PROJECT_CONFIG_DIR env var (useful for isolated e2e tests)
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("REELSIM_PROJECT_CONFIG_DIR") {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".reelsim/config.toml")
        }
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawReelsimConfig, overlay: RawReelsimConfig) -> RawReelsimConfig {
        let mut weights = base.model.weights;
        weights.extend(overlay.model.weights);

        RawReelsimConfig {
            model: RawModelConfig {
                baseline: overlay.model.baseline.or(base.model.baseline),
                stay_ceiling: overlay.model.stay_ceiling.or(base.model.stay_ceiling),
                base_replay_score: overlay
                    .model
                    .base_replay_score
                    .or(base.model.base_replay_score),
                loop_bonus: overlay.model.loop_bonus.or(base.model.loop_bonus),
                loop_trigger: overlay.model.loop_trigger.or(base.model.loop_trigger),
                weak_threshold: overlay.model.weak_threshold.or(base.model.weak_threshold),
                impact_noise_floor: overlay
                    .model
                    .impact_noise_floor
                    .or(base.model.impact_noise_floor),
                extrapolation: overlay.model.extrapolation.or(base.model.extrapolation),
                weights,
            },
            output: RawOutputConfig {
                precision: overlay.output.precision.or(base.output.precision),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawReelsimConfig) -> Result<ReelsimConfig> {
        let defaults = RetentionConfig::default();
        let mut weights = defaults.weights;
        weights.extend(raw.model.weights);

        let model = RetentionConfig {
            baseline: raw.model.baseline.unwrap_or(defaults.baseline),
            stay_ceiling: raw.model.stay_ceiling.unwrap_or(defaults.stay_ceiling),
            base_replay_score: raw
                .model
                .base_replay_score
                .unwrap_or(defaults.base_replay_score),
            loop_bonus: raw.model.loop_bonus.unwrap_or(defaults.loop_bonus),
            loop_trigger: raw.model.loop_trigger.unwrap_or(defaults.loop_trigger),
            weak_threshold: raw.model.weak_threshold.unwrap_or(defaults.weak_threshold),
            impact_noise_floor: raw
                .model
                .impact_noise_floor
                .unwrap_or(defaults.impact_noise_floor),
            extrapolation: raw.model.extrapolation.unwrap_or(defaults.extrapolation),
            weights,
        };
        model.validate()?;

        Ok(ReelsimConfig {
            output: OutputConfig {
                precision: raw.output.precision.unwrap_or(DEFAULT_PRECISION),
            },
            model,
        })
    }
}
