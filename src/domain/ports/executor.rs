//! Execution provider port.

use crate::domain::models::Step;
use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by an execution provider.
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Provider request failed: {0}")]
    Request(String),

    #[error("Provider returned unusable output: {0}")]
    Output(String),
}

/// Port for the collaborator that performs the actual step work.
///
/// The worker loop maps `Ok` to a succeeded completion and `Err` to a
/// failed one; it never retries execution itself. Throttling after
/// repeated failures is the fault breaker's job.
#[async_trait]
pub trait StepExecutor: Send + Sync {
    /// Execute a claimed step's payload and return its structured output.
    async fn execute(&self, step: &Step) -> Result<serde_json::Value, ExecutorError>;
}
