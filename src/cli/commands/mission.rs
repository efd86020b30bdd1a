//! `vanguard mission`: submit and inspect missions.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Deserialize;
use uuid::Uuid;

use super::open_database;
use crate::adapters::sqlite::{SqliteMissionStore, SqliteStepStore};
use crate::cli::output::{format_mission_table, format_step_table};
use crate::domain::models::{Mission, MissionStatus, Step};
use crate::domain::ports::{MissionStore, StepFilter, StepStore};

#[derive(Args)]
pub struct MissionArgs {
    #[command(subcommand)]
    pub command: MissionCommands,
}

#[derive(Subcommand)]
pub enum MissionCommands {
    /// Submit a new mission from a YAML step file
    Submit {
        /// Mission title
        #[arg(long)]
        title: String,
        /// YAML file with a list of steps (title, prompt, optional input)
        #[arg(long)]
        steps_file: String,
    },
    /// Show a mission and its steps
    Status {
        /// Mission ID
        id: Uuid,
    },
    /// List missions
    List {
        /// Filter by status (active, succeeded, failed)
        #[arg(long)]
        status: Option<String>,
    },
}

/// One step as authored in a mission file.
#[derive(Debug, Deserialize)]
struct StepSpec {
    title: String,
    prompt: String,
    #[serde(default)]
    input: Option<serde_json::Value>,
}

pub async fn execute(args: MissionArgs, config_path: Option<&str>, json: bool) -> Result<()> {
    let (_, pool) = open_database(config_path).await?;
    let missions = SqliteMissionStore::new(pool.clone());
    let steps = SqliteStepStore::new(pool);

    match args.command {
        MissionCommands::Submit { title, steps_file } => {
            let text = std::fs::read_to_string(&steps_file)
                .with_context(|| format!("Cannot read steps file {steps_file}"))?;
            let specs: Vec<StepSpec> =
                serde_yaml::from_str(&text).context("Malformed steps file")?;
            if specs.is_empty() {
                anyhow::bail!("Steps file contains no steps");
            }

            let mission = Mission::new(title);
            missions.insert(&mission).await?;

            let mut created = Vec::new();
            for spec in specs {
                let mut step = Step::new(mission.id, spec.title, spec.prompt);
                if let Some(input) = spec.input {
                    step = step.with_input(input);
                }
                steps.insert(&step).await?;
                created.push(step);
            }

            if json {
                let payload = serde_json::json!({
                    "mission_id": mission.id,
                    "steps": created.iter().map(|s| s.id).collect::<Vec<_>>(),
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Mission submitted!");
                println!("  Mission ID: {}", mission.id);
                println!("  Steps: {}", created.len());
            }
        }
        MissionCommands::Status { id } => {
            let mission = missions
                .get(id)
                .await?
                .with_context(|| format!("Mission not found: {id}"))?;
            let mission_steps = steps
                .list(StepFilter {
                    mission_id: Some(id),
                    ..Default::default()
                })
                .await?;

            if json {
                let payload = serde_json::json!({
                    "mission": mission,
                    "steps": mission_steps,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("{}", format_mission_table(std::slice::from_ref(&mission)));
                println!("{}", format_step_table(&mission_steps));
            }
        }
        MissionCommands::List { status } => {
            let status = status
                .as_deref()
                .map(|s| {
                    MissionStatus::from_str(s)
                        .with_context(|| format!("Unknown mission status: {s}"))
                })
                .transpose()?;
            let all = missions.list(status).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&all)?);
            } else {
                println!("{}", format_mission_table(&all));
            }
        }
    }

    Ok(())
}
