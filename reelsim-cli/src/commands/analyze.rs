use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use reelsim_core::{RetentionModel, ScriptAnalysis, ScriptAnalyzer, ScriptVariant, select_variant};

use super::{impact::print_impacts, load_variants, percent};
use crate::config::ConfigLoader;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Generator JSON holding one variant or an array of variants
    pub file: PathBuf,

    /// Variant id (defaults to the first variant)
    #[arg(long)]
    pub variant: Option<String>,

    /// Print the analysis as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: AnalyzeArgs, config_path: Option<&Path>) -> Result<()> {
    let config = ConfigLoader::load(config_path)?;
    let variants = load_variants(&args.file)?;
    let variant = select_variant(&variants, args.variant.as_deref())?;

    let analyzer = ScriptAnalyzer::new(config.model);
    let analysis = analyzer.analyze(variant)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print_report(&analyzer, variant, &analysis, config.output.precision);
    }
    Ok(())
}

/// Human-readable report: per-second table, summary and trigger impacts
pub(crate) fn print_report(
    analyzer: &ScriptAnalyzer,
    variant: &ScriptVariant,
    analysis: &ScriptAnalysis,
    precision: usize,
) {
    let config = analyzer.config();
    let retention = &analysis.retention;

    println!(
        "Variant: {} ({}s, {} events)",
        analysis.variant_id,
        analysis.duration_s,
        variant.timeline.len()
    );
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Second").fg(Color::Cyan),
        Cell::new("Baseline").fg(Color::Cyan),
        Cell::new("Stay").fg(Color::Cyan),
        Cell::new("Triggers").fg(Color::Cyan),
        Cell::new("").fg(Color::Cyan),
    ]);

    for (t, p_stay) in (0u32..).zip(&retention.predicted_p_stay) {
        let triggers = RetentionModel::active_triggers(&variant.timeline, t)
            .iter()
            .map(|trigger| trigger.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let weak = *p_stay < config.weak_threshold;
        let stay = Cell::new(percent(*p_stay, precision));

        table.add_row(vec![
            Cell::new(t),
            Cell::new(percent(config.baseline_at(t), precision)),
            if weak { stay.fg(Color::Yellow) } else { stay },
            Cell::new(triggers),
            Cell::new(if weak { "weak" } else { "" }),
        ]);
    }
    println!("{table}");
    println!();

    println!(
        "Predicted finish rate:  {}",
        percent(retention.predicted_finish_rate, precision)
    );
    println!(
        "Predicted replay score: {:.*}",
        precision, retention.predicted_replay_score
    );
    if analysis.weak_seconds.is_empty() {
        println!("Weak seconds:           none");
    } else {
        let seconds = analysis
            .weak_seconds
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        println!("Weak seconds:           {seconds}");
    }

    let flagged = variant.weak_events();
    if !flagged.is_empty() {
        println!("Flagged weak events:    {flagged:?}");
    }
    println!();

    print_impacts(&analysis.trigger_impact, precision);
}
