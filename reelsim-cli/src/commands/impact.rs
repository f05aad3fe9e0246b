use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use comfy_table::{
    Cell, CellAlignment, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED,
};
use reelsim_core::{ScriptAnalyzer, TriggerImpact, select_variant};

use super::load_variants;
use crate::config::ConfigLoader;

#[derive(Args)]
pub struct ImpactArgs {
    /// Generator JSON holding one variant or an array of variants
    pub file: PathBuf,

    /// Variant id (defaults to the first variant)
    #[arg(long)]
    pub variant: Option<String>,

    /// Print the ranking as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ImpactArgs, config_path: Option<&Path>) -> Result<()> {
    let config = ConfigLoader::load(config_path)?;
    let variants = load_variants(&args.file)?;
    let variant = select_variant(&variants, args.variant.as_deref())?;

    let analysis = ScriptAnalyzer::new(config.model).analyze(variant)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis.trigger_impact)?);
    } else {
        print_impacts(&analysis.trigger_impact, config.output.precision);
    }
    Ok(())
}

/// Ranked impact table, strongest first
pub(crate) fn print_impacts(impacts: &[TriggerImpact], precision: usize) {
    if impacts.is_empty() {
        println!("No trigger moves the finish rate.");
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").fg(Color::Cyan),
        Cell::new("Trigger").fg(Color::Cyan),
        Cell::new("Impact").fg(Color::Cyan),
    ]);

    for (rank, impact) in impacts.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(impact.trigger.label()),
            Cell::new(format!("+{:.*} pp", precision, impact.impact))
                .set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");
}
