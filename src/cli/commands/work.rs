//! `vanguard work`: run the worker pool until interrupted.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use tokio::sync::watch;
use tracing::info;

use super::open_database;
use crate::adapters::executors::HttpCompletionExecutor;
use crate::adapters::sqlite::SqliteStepStore;
use crate::domain::ports::StepExecutor;
use crate::services::fault_breaker::FaultBreakerConfig;
use crate::services::registry::AgentRegistry;
use crate::services::worker::{Worker, WorkerConfig};

#[derive(Args)]
pub struct WorkArgs {
    /// Number of workers to run (overrides configuration)
    #[arg(long)]
    pub workers: Option<usize>,
}

pub async fn execute(args: WorkArgs, config_path: Option<&str>, _json: bool) -> Result<()> {
    let (config, pool) = open_database(config_path).await?;

    let registry = match &config.registry.agents_file {
        Some(path) => AgentRegistry::from_yaml_file(path)
            .with_context(|| format!("Cannot load agents file {path}"))?,
        None => AgentRegistry::new(),
    };
    if !registry.is_empty() {
        info!(agents = ?registry.names(), "Agent registry loaded");
    }

    let store = Arc::new(SqliteStepStore::new(pool));
    let executor: Arc<dyn StepExecutor> =
        Arc::new(HttpCompletionExecutor::new(&config.executor).context("Cannot build executor")?);

    let worker_config = WorkerConfig {
        poll_interval: Duration::from_millis(config.worker.poll_interval_ms),
        candidate_batch: config.worker.candidate_batch,
        breaker: FaultBreakerConfig {
            failure_threshold: config.breaker.failure_threshold,
            cool_down: chrono::Duration::seconds(
                i64::try_from(config.breaker.cool_down_secs).unwrap_or(i64::MAX),
            ),
        },
    };

    let count = args.workers.unwrap_or(config.worker.count).max(1);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    info!(count, "Starting worker pool");
    let mut handles = Vec::with_capacity(count);
    for n in 0..count {
        let mut worker = Worker::new(
            format!("worker-{n}"),
            Arc::clone(&store),
            Arc::clone(&executor),
            worker_config.clone(),
        );
        let rx = shutdown_rx.clone();
        handles.push(tokio::spawn(async move { worker.run(rx).await }));
    }

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutdown signal received, stopping workers");
    let _ = shutdown_tx.send(true);

    futures::future::join_all(handles).await;
    info!("Worker pool stopped");
    Ok(())
}
