//! `vanguard step`: inspect steps.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use uuid::Uuid;

use super::open_database;
use crate::adapters::sqlite::SqliteStepStore;
use crate::cli::output::format_step_table;
use crate::domain::models::StepStatus;
use crate::domain::ports::{StepFilter, StepStore};

#[derive(Args)]
pub struct StepArgs {
    #[command(subcommand)]
    pub command: StepCommands,
}

#[derive(Subcommand)]
pub enum StepCommands {
    /// List steps
    List {
        /// Filter by mission ID
        #[arg(long)]
        mission: Option<Uuid>,
        /// Filter by status (pending, claimed, succeeded, failed)
        #[arg(long)]
        status: Option<String>,
    },
    /// Show a single step including its output
    Show {
        /// Step ID
        id: Uuid,
    },
}

pub async fn execute(args: StepArgs, config_path: Option<&str>, json: bool) -> Result<()> {
    let (_, pool) = open_database(config_path).await?;
    let steps = SqliteStepStore::new(pool);

    match args.command {
        StepCommands::List { mission, status } => {
            let status = status
                .as_deref()
                .map(|s| {
                    StepStatus::from_str(s).with_context(|| format!("Unknown step status: {s}"))
                })
                .transpose()?;

            let found = steps
                .list(StepFilter {
                    mission_id: mission,
                    status,
                    ..Default::default()
                })
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&found)?);
            } else {
                println!("{}", format_step_table(&found));
            }
        }
        StepCommands::Show { id } => {
            let step = steps
                .get(id)
                .await?
                .with_context(|| format!("Step not found: {id}"))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&step)?);
            } else {
                println!("{}", format_step_table(std::slice::from_ref(&step)));
                if let Some(output) = &step.output {
                    println!("Output:\n{}", serde_json::to_string_pretty(output)?);
                }
                if let Some(error) = &step.error_message {
                    println!("Error: {error}");
                }
            }
        }
    }

    Ok(())
}
