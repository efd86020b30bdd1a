//! Domain errors for the Vanguard coordination engine.

use thiserror::Error;
use uuid::Uuid;

/// Domain-level errors that can occur in the Vanguard system.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Mission not found: {0}")]
    MissionNotFound(Uuid),

    #[error("Step not found: {0}")]
    StepNotFound(Uuid),

    #[error("Agent profile not found: {0}")]
    AgentNotFound(String),

    #[error("Duplicate agent profile: {0}")]
    DuplicateAgent(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
