use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use reelsim_core::{ScriptAnalyzer, Trigger, select_variant};
use tracing::info;

use super::{load_variants, percent};
use crate::config::ConfigLoader;

#[derive(Args)]
pub struct ApplyArgs {
    /// Generator JSON holding one variant or an array of variants
    pub file: PathBuf,

    /// Variant id (defaults to the first variant)
    #[arg(long)]
    pub variant: Option<String>,

    /// Zero-based index of the timeline event
    #[arg(long)]
    pub event: usize,

    /// Suggested trigger to apply, e.g. jump_cut
    #[arg(long)]
    pub trigger: String,

    /// Write the edited variants as JSON to this file
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub fn run(args: ApplyArgs, config_path: Option<&Path>) -> Result<()> {
    let config = ConfigLoader::load(config_path)?;
    let precision = config.output.precision;
    let mut variants = load_variants(&args.file)?;
    let variant = select_variant(&variants, args.variant.as_deref())?;
    let trigger = Trigger::from(args.trigger.as_str());

    let analyzer = ScriptAnalyzer::new(config.model);
    let edited = variant.with_suggestion_applied(args.event, &trigger)?;
    let before = analyzer.analyze(variant)?;
    let after = analyzer.analyze(&edited)?;

    let before_rate = before.retention.predicted_finish_rate;
    let after_rate = after.retention.predicted_finish_rate;
    println!(
        "Applied '{}' to event {} of {}",
        trigger.label(),
        args.event,
        edited.variant_id
    );
    println!("Finish rate before: {}", percent(before_rate, precision));
    println!("Finish rate after:  {}", percent(after_rate, precision));
    println!(
        "Change:             {:+.*} pp",
        precision,
        (after_rate - before_rate) * 100.0
    );

    if let Some(output) = args.output {
        let id = edited.variant_id.clone();
        if let Some(slot) = variants.iter_mut().find(|v| v.variant_id == id) {
            *slot = edited;
        }
        let json = serde_json::to_string_pretty(&variants)?;
        std::fs::write(&output, json)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        info!(path = %output.display(), "wrote edited script");
    }
    Ok(())
}
