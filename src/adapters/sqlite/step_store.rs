//! SQLite implementation of the StepStore.
//!
//! The two coordination operations lean on SQLite's serialized writers:
//! `claim` is a single conditional UPDATE whose `rows_affected` decides
//! the race, and `complete` wraps the terminal transition and the
//! conditional mission finalization in one transaction. No in-process
//! locking sits on top.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    MissionOutcome, MissionSignal, Step, StepOutcome, StepPayload, StepStatus,
};
use crate::domain::ports::{StepFilter, StepStore};

#[derive(Clone)]
pub struct SqliteStepStore {
    pool: SqlitePool,
}

impl SqliteStepStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StepStore for SqliteStepStore {
    async fn insert(&self, step: &Step) -> DomainResult<()> {
        step.validate().map_err(DomainError::ValidationFailed)?;
        let input_json = step
            .payload
            .input
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let output_json = step.output.as_ref().map(serde_json::to_string).transpose()?;

        sqlx::query(
            r#"INSERT INTO steps (id, mission_id, title, prompt, input, status, claimed_by,
               output, error_message, created_at, claimed_at, completed_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(step.id.to_string())
        .bind(step.mission_id.to_string())
        .bind(&step.title)
        .bind(&step.payload.prompt)
        .bind(&input_json)
        .bind(step.status.as_str())
        .bind(&step.claimed_by)
        .bind(&output_json)
        .bind(&step.error_message)
        .bind(step.created_at.to_rfc3339())
        .bind(step.claimed_at.map(|t| t.to_rfc3339()))
        .bind(step.completed_at.map(|t| t.to_rfc3339()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Step>> {
        let row: Option<StepRow> = sqlx::query_as("SELECT * FROM steps WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list(&self, filter: StepFilter) -> DomainResult<Vec<Step>> {
        let mut query = String::from("SELECT * FROM steps WHERE 1=1");
        let mut bindings: Vec<String> = Vec::new();

        if let Some(mission_id) = &filter.mission_id {
            query.push_str(" AND mission_id = ?");
            bindings.push(mission_id.to_string());
        }
        if let Some(status) = &filter.status {
            query.push_str(" AND status = ?");
            bindings.push(status.as_str().to_string());
        }
        if let Some(claimed_by) = &filter.claimed_by {
            query.push_str(" AND claimed_by = ?");
            bindings.push(claimed_by.clone());
        }

        query.push_str(" ORDER BY created_at, id");

        if let Some(limit) = filter.limit {
            query.push_str(&format!(" LIMIT {limit}"));
        }

        let mut q = sqlx::query_as::<_, StepRow>(&query);
        for binding in &bindings {
            q = q.bind(binding);
        }

        let rows: Vec<StepRow> = q.fetch_all(&self.pool).await?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn pending_candidates(&self, limit: usize) -> DomainResult<Vec<Step>> {
        let rows: Vec<StepRow> = sqlx::query_as(
            r#"SELECT * FROM steps
               WHERE status = 'pending' AND claimed_by IS NULL
               ORDER BY created_at, id
               LIMIT ?"#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn claim(&self, step_id: Uuid, worker_id: &str) -> DomainResult<bool> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            r#"UPDATE steps SET status = 'claimed', claimed_by = ?, claimed_at = ?
               WHERE id = ? AND status = 'pending' AND claimed_by IS NULL"#,
        )
        .bind(worker_id)
        .bind(&now)
        .bind(step_id.to_string())
        .execute(&self.pool)
        .await?;

        // The WHERE clause decides the race: of any number of concurrent
        // callers, exactly one UPDATE matches the pending row.
        let won = result.rows_affected() == 1;
        debug!(step_id = %step_id, worker_id = %worker_id, won, "Claim attempt");
        Ok(won)
    }

    async fn complete(
        &self,
        step_id: Uuid,
        worker_id: &str,
        outcome: StepOutcome,
    ) -> DomainResult<MissionSignal> {
        let (output_json, error_message) = match &outcome {
            StepOutcome::Succeeded(output) => {
                (output.as_ref().map(serde_json::to_string).transpose()?, None)
            }
            StepOutcome::Failed(message) => (None, Some(message.clone())),
        };
        let now = Utc::now().to_rfc3339();

        let mut tx = self.pool.begin().await?;

        // Terminal transition, guarded by the caller's claim. A mismatched
        // worker or an already-terminal step matches no row and nothing is
        // mutated.
        let updated = sqlx::query(
            r#"UPDATE steps SET status = ?, output = ?, error_message = ?, completed_at = ?
               WHERE id = ? AND status = 'claimed' AND claimed_by = ?"#,
        )
        .bind(outcome.status().as_str())
        .bind(&output_json)
        .bind(&error_message)
        .bind(&now)
        .bind(step_id.to_string())
        .bind(worker_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            debug!(step_id = %step_id, worker_id = %worker_id, "Completion rejected");
            return Ok(MissionSignal::Ignored);
        }

        let (mission_id,): (String,) =
            sqlx::query_as("SELECT mission_id FROM steps WHERE id = ?")
                .bind(step_id.to_string())
                .fetch_one(&mut *tx)
                .await?;
        let mission_id = Uuid::parse_str(&mission_id)
            .map_err(|e| DomainError::SerializationError(e.to_string()))?;

        // Re-evaluate the mission inside the same transaction so that the
        // "complete step" and "maybe finalize mission" decisions are one
        // atomic unit.
        let (remaining,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM steps WHERE mission_id = ? AND status NOT IN ('succeeded', 'failed')",
        )
        .bind(mission_id.to_string())
        .fetch_one(&mut *tx)
        .await?;

        if remaining > 0 {
            tx.commit().await?;
            return Ok(MissionSignal::InFlight { mission_id });
        }

        let (failed,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM steps WHERE mission_id = ? AND status = 'failed'",
        )
        .bind(mission_id.to_string())
        .fetch_one(&mut *tx)
        .await?;

        let outcome = if failed == 0 {
            MissionOutcome::Succeeded
        } else {
            MissionOutcome::Failed
        };

        // The finalized_at guard makes finalization exactly-once even if
        // another writer slipped in between our commit points.
        let finalized = sqlx::query(
            "UPDATE missions SET status = ?, finalized_at = ? WHERE id = ? AND finalized_at IS NULL",
        )
        .bind(outcome.status().as_str())
        .bind(&now)
        .bind(mission_id.to_string())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        if finalized.rows_affected() == 1 {
            Ok(MissionSignal::Finalized {
                mission_id,
                outcome,
            })
        } else {
            Ok(MissionSignal::InFlight { mission_id })
        }
    }
}

#[derive(sqlx::FromRow)]
struct StepRow {
    id: String,
    mission_id: String,
    title: String,
    prompt: String,
    input: Option<String>,
    status: String,
    claimed_by: Option<String>,
    output: Option<String>,
    error_message: Option<String>,
    created_at: String,
    claimed_at: Option<String>,
    completed_at: Option<String>,
}

impl TryFrom<StepRow> for Step {
    type Error = DomainError;

    fn try_from(row: StepRow) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| DomainError::SerializationError(e.to_string()))?;
        let mission_id = Uuid::parse_str(&row.mission_id)
            .map_err(|e| DomainError::SerializationError(e.to_string()))?;

        let status = StepStatus::from_str(&row.status).ok_or_else(|| {
            DomainError::SerializationError(format!("Invalid step status: {}", row.status))
        })?;

        let input = row
            .input
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(|e| DomainError::SerializationError(e.to_string()))?;
        let output = row
            .output
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(|e| DomainError::SerializationError(e.to_string()))?;

        Ok(Step {
            id,
            mission_id,
            title: row.title,
            payload: StepPayload {
                prompt: row.prompt,
                input,
            },
            status,
            claimed_by: row.claimed_by,
            output,
            error_message: row.error_message,
            created_at: parse_timestamp(&row.created_at)?,
            claimed_at: row.claimed_at.as_deref().map(parse_timestamp).transpose()?,
            completed_at: row
                .completed_at
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
        })
    }
}

fn parse_timestamp(s: &str) -> Result<chrono::DateTime<chrono::Utc>, DomainError> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&chrono::Utc))
        .map_err(|e| DomainError::SerializationError(e.to_string()))
}
