use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::config::ConfigLoader;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the merged configuration as TOML
    Show,
    /// List config layers in merge order and whether each file exists
    Path,
}

pub fn run(args: ConfigArgs, explicit: Option<&Path>) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(explicit),
        ConfigCommands::Path => show_layers(explicit),
    }
}

fn show_config(explicit: Option<&Path>) -> Result<()> {
    let config = ConfigLoader::load(explicit)?;
    let model = &config.model;

    // Summary as TOML comments so the output stays loadable with --config
    println!(
        "# baseline: {}s curve, {:?} past the end",
        model.baseline.len(),
        model.extrapolation
    );
    println!(
        "# weights: {} triggers, loop trigger {}",
        model.weights.len(),
        model.loop_trigger
    );
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

/// Config layers in the order they are merged, later entries winning
fn layers(explicit: Option<&Path>) -> Vec<(&'static str, Option<PathBuf>)> {
    vec![
        ("user", ConfigLoader::user_config_path()),
        ("project", Some(ConfigLoader::project_config_path())),
        ("--config", explicit.map(Path::to_path_buf)),
    ]
}

fn show_layers(explicit: Option<&Path>) -> Result<()> {
    for (name, path) in layers(explicit) {
        match path {
            Some(path) => {
                let state = if path.exists() { "loaded" } else { "missing" };
                println!("{name:<9} {state:<8} {}", path.display());
            }
            None => println!("{name:<9} {:<8} -", "unset"),
        }
    }
    Ok(())
}
