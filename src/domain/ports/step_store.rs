//! Step persistence and claim coordination port.

use crate::domain::errors::DomainResult;
use crate::domain::models::{MissionSignal, Step, StepOutcome, StepStatus};
use async_trait::async_trait;
use uuid::Uuid;

/// Filters for querying steps.
#[derive(Default, Debug, Clone)]
pub struct StepFilter {
    pub mission_id: Option<Uuid>,
    pub status: Option<StepStatus>,
    pub claimed_by: Option<String>,
    pub limit: Option<i64>,
}

/// Repository port for step persistence plus the two atomic coordination
/// operations.
///
/// `claim` and `complete` are the only mutual-exclusion mechanism in the
/// system: correctness rests on the implementation executing each as a
/// single linearizable unit against the backing store, with no in-process
/// locking on top.
#[async_trait]
pub trait StepStore: Send + Sync {
    /// Insert a new pending step.
    async fn insert(&self, step: &Step) -> DomainResult<()>;

    /// Get a step by ID.
    async fn get(&self, id: Uuid) -> DomainResult<Option<Step>>;

    /// List steps with optional filters.
    async fn list(&self, filter: StepFilter) -> DomainResult<Vec<Step>>;

    /// Fetch unclaimed pending steps, oldest first, for claim attempts.
    async fn pending_candidates(&self, limit: usize) -> DomainResult<Vec<Step>>;

    /// Atomically claim a pending step for a worker.
    ///
    /// Returns `true` iff the step was pending with no assigned worker and
    /// this call transitioned it to claimed. Exactly one of any number of
    /// concurrent callers observes `true`; the rest, and callers naming a
    /// nonexistent or already-terminal step, observe `false`. A lost race
    /// is not an error.
    async fn claim(&self, step_id: Uuid, worker_id: &str) -> DomainResult<bool>;

    /// Atomically record a terminal outcome for a claimed step and, within
    /// the same atomic unit, finalize the owning mission if this was its
    /// last non-terminal step.
    ///
    /// A completion from a worker that does not hold the claim, or of a
    /// step already terminal, mutates nothing and yields
    /// [`MissionSignal::Ignored`]. Repeating a completion is therefore safe
    /// and changes nothing; it never overwrites an earlier result.
    async fn complete(
        &self,
        step_id: Uuid,
        worker_id: &str,
        outcome: StepOutcome,
    ) -> DomainResult<MissionSignal>;
}
