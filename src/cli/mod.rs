//! Command-line interface for the Vanguard coordination engine.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use console::style;

/// Mission/step coordination engine.
#[derive(Parser)]
#[command(name = "vanguard", version, about)]
pub struct Cli {
    /// Emit machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to a configuration file (defaults to vanguard.yaml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database schema
    Init,
    /// Manage missions
    Mission(commands::mission::MissionArgs),
    /// Inspect steps
    Step(commands::step::StepArgs),
    /// Run the worker pool until interrupted
    Work(commands::work::WorkArgs),
}

/// Print an error and exit with a non-zero status.
pub fn handle_error(err: anyhow::Error, json: bool) {
    if json {
        let payload = serde_json::json!({ "error": format!("{err:#}") });
        eprintln!("{payload}");
    } else {
        eprintln!("{} {err:#}", style("error:").red().bold());
    }
    std::process::exit(1);
}
