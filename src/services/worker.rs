//! Worker orchestration loop.
//!
//! Drives one worker: gate on the fault breaker, race for a claim, execute
//! the payload, report the outcome atomically, and feed the result back
//! into the breaker. Losing every claim race is the expected steady state
//! under contention, not an error.

use std::sync::Arc;
use std::time::Duration;

use backoff::ExponentialBackoffBuilder;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{MissionSignal, Step, StepOutcome};
use crate::domain::ports::{StepExecutor, StepStore};
use crate::services::fault_breaker::{FaultBreaker, FaultBreakerConfig};

/// Configuration for a single worker loop.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Idle interval between loop cycles.
    pub poll_interval: Duration,
    /// How many pending candidates to fetch per cycle.
    pub candidate_batch: usize,
    /// Breaker thresholds for this worker.
    pub breaker: FaultBreakerConfig,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            candidate_batch: 8,
            breaker: FaultBreakerConfig::default(),
        }
    }
}

/// What a single loop cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Breaker is open; no claim was attempted this cycle.
    Throttled,
    /// No candidate could be claimed; all races lost or queue empty.
    Idle,
    /// A step was claimed, executed, and completed.
    Completed {
        step_id: Uuid,
        succeeded: bool,
        signal: MissionSignal,
    },
}

/// A single worker driving the claim/execute/complete cycle.
///
/// The worker exclusively owns its breaker; nothing else reads or writes
/// it, so no locking is needed around breaker state.
pub struct Worker<S: StepStore> {
    id: String,
    store: Arc<S>,
    executor: Arc<dyn StepExecutor>,
    breaker: FaultBreaker,
    config: WorkerConfig,
}

impl<S: StepStore> Worker<S> {
    pub fn new(
        id: impl Into<String>,
        store: Arc<S>,
        executor: Arc<dyn StepExecutor>,
        config: WorkerConfig,
    ) -> Self {
        let breaker = FaultBreaker::new(config.breaker.clone());
        Self {
            id: id.into(),
            store,
            executor,
            breaker,
            config,
        }
    }

    /// This worker's identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Read-only view of this worker's breaker.
    pub fn breaker(&self) -> &FaultBreaker {
        &self.breaker
    }

    /// Run the loop until the shutdown signal flips to `true`.
    ///
    /// Transient store errors are logged and retried on the next cycle;
    /// the loop never terminates on a single step's failure.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        info!(worker_id = %self.id, "Worker loop started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            match self.tick().await {
                Ok(TickOutcome::Completed { step_id, succeeded, .. }) => {
                    debug!(worker_id = %self.id, step_id = %step_id, succeeded, "Cycle completed a step");
                    // Immediately look for more work after a completion.
                    continue;
                }
                Ok(TickOutcome::Throttled) => {
                    debug!(worker_id = %self.id, "Breaker open, skipping cycle");
                }
                Ok(TickOutcome::Idle) => {}
                Err(e) => {
                    warn!(worker_id = %self.id, error = %e, "Cycle failed, backing off until next poll");
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.config.poll_interval) => {}
                _ = shutdown.changed() => {}
            }
        }

        info!(worker_id = %self.id, "Worker loop stopped");
    }

    /// Run a single loop cycle.
    pub async fn tick(&mut self) -> DomainResult<TickOutcome> {
        // Gate before touching the store: an open breaker is a throttling
        // signal, not an execution failure.
        if !self.breaker.can_execute() {
            return Ok(TickOutcome::Throttled);
        }

        let candidates = self
            .store
            .pending_candidates(self.config.candidate_batch)
            .await?;

        for step in candidates {
            if !self.store.claim(step.id, &self.id).await? {
                // Lost the race; move on to the next candidate.
                debug!(worker_id = %self.id, step_id = %step.id, "Claim lost");
                continue;
            }

            info!(worker_id = %self.id, step_id = %step.id, title = %step.title, "Claimed step");
            return self.execute_claimed(step).await;
        }

        Ok(TickOutcome::Idle)
    }

    /// Execute a step this worker has claimed and report its outcome.
    async fn execute_claimed(&mut self, step: Step) -> DomainResult<TickOutcome> {
        let outcome = match self.executor.execute(&step).await {
            Ok(output) => StepOutcome::Succeeded(Some(output)),
            Err(e) => {
                warn!(worker_id = %self.id, step_id = %step.id, error = %e, "Step execution failed");
                StepOutcome::Failed(e.to_string())
            }
        };
        let succeeded = outcome.is_success();

        let signal = self.complete_with_retry(step.id, outcome).await?;
        if signal.is_ignored() {
            // The store rejected the completion: we no longer hold the
            // claim or the step is already terminal. Log and carry on.
            warn!(worker_id = %self.id, step_id = %step.id, "Completion ignored by store");
        }
        if let MissionSignal::Finalized { mission_id, outcome } = signal {
            info!(worker_id = %self.id, mission_id = %mission_id, ?outcome, "Mission finalized");
        }

        if succeeded {
            self.breaker.record_success();
        } else {
            self.breaker.record_failure();
        }

        Ok(TickOutcome::Completed {
            step_id: step.id,
            succeeded,
            signal,
        })
    }

    /// Report a completion, retrying transient store failures with
    /// exponential backoff. The store-side claim check makes the retry
    /// safe: an indeterminate first attempt that actually landed turns the
    /// repeat into a no-op signal rather than a double write.
    async fn complete_with_retry(
        &self,
        step_id: Uuid,
        outcome: StepOutcome,
    ) -> DomainResult<MissionSignal> {
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(Duration::from_millis(100))
            .with_max_elapsed_time(Some(Duration::from_secs(10)))
            .build();

        backoff::future::retry(policy, || {
            let outcome = outcome.clone();
            async move {
                self.store
                    .complete(step_id, &self.id, outcome)
                    .await
                    .map_err(|e| match e {
                        DomainError::DatabaseError(_) => backoff::Error::transient(e),
                        other => backoff::Error::permanent(other),
                    })
            }
        })
        .await
    }
}
