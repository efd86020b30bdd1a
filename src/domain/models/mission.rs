//! Mission domain model.
//!
//! A mission groups steps that share a goal. Its aggregate status is
//! derived from its steps and it is finalized exactly once, inside the
//! same atomic unit that records the last step's terminal status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Aggregate status of a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    /// At least one step is not yet terminal
    Active,
    /// All steps succeeded
    Succeeded,
    /// All steps are terminal and at least one failed
    Failed,
}

impl Default for MissionStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl MissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "succeeded" => Some(Self::Succeeded),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Aggregate outcome of a finalized mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionOutcome {
    Succeeded,
    Failed,
}

impl MissionOutcome {
    /// The mission status this outcome maps to.
    pub fn status(&self) -> MissionStatus {
        match self {
            Self::Succeeded => MissionStatus::Succeeded,
            Self::Failed => MissionStatus::Failed,
        }
    }
}

/// Result of a step completion, communicated back to the caller so it can
/// react to mission finalization without a separate read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionSignal {
    /// The completion did not match a claim held by the caller; nothing
    /// was mutated.
    Ignored,
    /// The step was recorded but the mission still has non-terminal steps.
    InFlight { mission_id: Uuid },
    /// This completion was the mission's last terminal transition; the
    /// mission was finalized by the caller, exactly once.
    Finalized {
        mission_id: Uuid,
        outcome: MissionOutcome,
    },
}

impl MissionSignal {
    pub fn is_finalized(&self) -> bool {
        matches!(self, Self::Finalized { .. })
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }
}

/// A job composed of one or more steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    /// Unique identifier
    pub id: Uuid,
    /// Human-readable title
    pub title: String,
    /// Aggregate status
    pub status: MissionStatus,
    /// When created
    pub created_at: DateTime<Utc>,
    /// Set exactly once, when the last step reaches a terminal status
    pub finalized_at: Option<DateTime<Utc>>,
}

impl Mission {
    /// Create a new active mission.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            status: MissionStatus::default(),
            created_at: Utc::now(),
            finalized_at: None,
        }
    }

    /// Check if the mission has been finalized.
    pub fn is_finalized(&self) -> bool {
        self.finalized_at.is_some()
    }

    /// Validate the mission before insertion.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Mission title cannot be empty".to_string());
        }
        Ok(())
    }
}
