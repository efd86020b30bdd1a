//! Step domain model.
//!
//! Steps are the smallest schedulable units of work. They belong to a
//! mission and are mutated only through the store's claim/complete
//! operations, never directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a step in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Step is waiting for a worker to claim it
    Pending,
    /// Step is exclusively owned by a worker
    Claimed,
    /// Step finished successfully
    Succeeded,
    /// Step finished with an error
    Failed,
}

impl Default for StepStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Claimed => "claimed",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "claimed" => Some(Self::Claimed),
            "succeeded" => Some(Self::Succeeded),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// Terminal result reported by a worker for a step it holds.
///
/// Output is only representable on success; failures carry an error
/// message instead.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Succeeded(Option<serde_json::Value>),
    Failed(String),
}

impl StepOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    /// The terminal status this outcome maps to.
    pub fn status(&self) -> StepStatus {
        match self {
            Self::Succeeded(_) => StepStatus::Succeeded,
            Self::Failed(_) => StepStatus::Failed,
        }
    }
}

/// Work payload handed to the executor when a step runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepPayload {
    /// Prompt text sent to the execution provider
    pub prompt: String,
    /// Optional structured input merged into the request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<serde_json::Value>,
}

/// A discrete unit of work belonging to a mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Unique identifier
    pub id: Uuid,
    /// Owning mission
    pub mission_id: Uuid,
    /// Human-readable title
    pub title: String,
    /// Work payload
    pub payload: StepPayload,
    /// Current status
    pub status: StepStatus,
    /// Worker that holds (or held) the claim
    pub claimed_by: Option<String>,
    /// Output produced on success
    pub output: Option<serde_json::Value>,
    /// Error message recorded on failure
    pub error_message: Option<String>,
    /// When created
    pub created_at: DateTime<Utc>,
    /// When claimed
    pub claimed_at: Option<DateTime<Utc>>,
    /// When a terminal status was recorded
    pub completed_at: Option<DateTime<Utc>>,
}

impl Step {
    /// Create a new pending step for a mission.
    pub fn new(mission_id: Uuid, title: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            mission_id,
            title: title.into(),
            payload: StepPayload {
                prompt: prompt.into(),
                input: None,
            },
            status: StepStatus::default(),
            claimed_by: None,
            output: None,
            error_message: None,
            created_at: Utc::now(),
            claimed_at: None,
            completed_at: None,
        }
    }

    /// Attach structured input to the payload.
    pub fn with_input(mut self, input: serde_json::Value) -> Self {
        self.payload.input = Some(input);
        self
    }

    /// Check if the step has reached a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Validate the step before insertion.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Step title cannot be empty".to_string());
        }
        if self.payload.prompt.trim().is_empty() {
            return Err("Step prompt cannot be empty".to_string());
        }
        Ok(())
    }
}
