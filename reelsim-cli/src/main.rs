use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(
    name = "reelsim",
    about = "Retention simulation for short-form video scripts"
)]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Extra config file layered over user and project config
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a script's retention curve
    Analyze(commands::analyze::AnalyzeArgs),
    /// Rank triggers by their contribution to the finish rate
    Impact(commands::impact::ImpactArgs),
    /// Apply a suggested trigger and compare finish rates
    Apply(commands::apply::ApplyArgs),
    /// Write each variant as a markdown report
    Export(commands::export::ExportArgs),
    /// Analyze the bundled sample scripts
    Demo(commands::demo::DemoArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Analyze(args) => commands::analyze::run(args, config),
        Commands::Impact(args) => commands::impact::run(args, config),
        Commands::Apply(args) => commands::apply::run(args, config),
        Commands::Export(args) => commands::export::run(args, config),
        Commands::Demo(args) => commands::demo::run(args, config),
        Commands::Config(args) => commands::config::run(args, config),
    }
}
