//! Mission persistence port.

use crate::domain::errors::DomainResult;
use crate::domain::models::{Mission, MissionStatus};
use async_trait::async_trait;
use uuid::Uuid;

/// Repository port for mission persistence.
///
/// Missions are created here but finalized only through
/// [`crate::domain::ports::StepStore::complete`].
#[async_trait]
pub trait MissionStore: Send + Sync {
    /// Insert a new active mission.
    async fn insert(&self, mission: &Mission) -> DomainResult<()>;

    /// Get a mission by ID.
    async fn get(&self, id: Uuid) -> DomainResult<Option<Mission>>;

    /// List missions, newest first, optionally filtered by status.
    async fn list(&self, status: Option<MissionStatus>) -> DomainResult<Vec<Mission>>;
}
