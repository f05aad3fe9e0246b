pub mod analyze;
pub mod apply;
pub mod config;
pub mod demo;
pub mod export;
pub mod impact;

use std::path::Path;

use anyhow::{Context, Result};
use reelsim_core::{JsonFileSource, ScriptSource, ScriptVariant};

/// Load every variant from a generator JSON file
pub(crate) fn load_variants(file: &Path) -> Result<Vec<ScriptVariant>> {
    JsonFileSource::new(file)
        .load_variants()
        .with_context(|| format!("Failed to load scripts from {}", file.display()))
}

/// Format a probability as a percentage
pub(crate) fn percent(value: f64, precision: usize) -> String {
    format!("{:.*}%", precision, value * 100.0)
}
