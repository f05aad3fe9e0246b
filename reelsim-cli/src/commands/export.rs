use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use reelsim_core::{ScriptAnalyzer, export_file_name, render_markdown};
use tracing::info;

use super::load_variants;
use crate::config::ConfigLoader;

#[derive(Args)]
pub struct ExportArgs {
    /// Generator JSON holding one variant or an array of variants
    pub file: PathBuf,

    /// Directory for the markdown files
    #[arg(long, default_value = ".")]
    pub out: PathBuf,
}

pub fn run(args: ExportArgs, config_path: Option<&Path>) -> Result<()> {
    let config = ConfigLoader::load(config_path)?;
    let variants = load_variants(&args.file)?;
    let analyzer = ScriptAnalyzer::new(config.model);

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("Failed to create {}", args.out.display()))?;

    for (index, variant) in variants.iter().enumerate() {
        let analysis = analyzer.analyze(variant)?;
        let markdown = render_markdown(
            index,
            variant,
            &analysis.retention,
            &analysis.trigger_impact,
        );

        let path = args.out.join(export_file_name(index));
        std::fs::write(&path, markdown)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(variant = %variant.variant_id, path = %path.display(), "exported");
        println!("{}", path.display());
    }
    Ok(())
}
