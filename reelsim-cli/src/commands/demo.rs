use std::path::Path;

use anyhow::Result;
use clap::Args;
use reelsim_core::{SampleScripts, ScriptAnalyzer, ScriptSource};

use super::analyze::print_report;
use crate::config::ConfigLoader;

#[derive(Args)]
pub struct DemoArgs {
    /// Print the analyses as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: DemoArgs, config_path: Option<&Path>) -> Result<()> {
    let config = ConfigLoader::load(config_path)?;
    let variants = SampleScripts.load_variants()?;
    let analyzer = ScriptAnalyzer::new(config.model);

    let analyses = variants
        .iter()
        .map(|variant| analyzer.analyze(variant))
        .collect::<reelsim_core::Result<Vec<_>>>()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analyses)?);
        return Ok(());
    }

    for (variant, analysis) in variants.iter().zip(&analyses) {
        print_report(&analyzer, variant, analysis, config.output.precision);
        println!();
    }
    Ok(())
}
