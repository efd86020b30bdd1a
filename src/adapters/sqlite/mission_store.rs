//! SQLite implementation of the MissionStore.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Mission, MissionStatus};
use crate::domain::ports::MissionStore;

#[derive(Clone)]
pub struct SqliteMissionStore {
    pool: SqlitePool,
}

impl SqliteMissionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MissionStore for SqliteMissionStore {
    async fn insert(&self, mission: &Mission) -> DomainResult<()> {
        mission.validate().map_err(DomainError::ValidationFailed)?;

        sqlx::query(
            r#"INSERT INTO missions (id, title, status, created_at, finalized_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(mission.id.to_string())
        .bind(&mission.title)
        .bind(mission.status.as_str())
        .bind(mission.created_at.to_rfc3339())
        .bind(mission.finalized_at.map(|t| t.to_rfc3339()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Mission>> {
        let row: Option<MissionRow> = sqlx::query_as("SELECT * FROM missions WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list(&self, status: Option<MissionStatus>) -> DomainResult<Vec<Mission>> {
        let rows: Vec<MissionRow> = match status {
            Some(status) => {
                sqlx::query_as("SELECT * FROM missions WHERE status = ? ORDER BY created_at DESC")
                    .bind(status.as_str())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as("SELECT * FROM missions ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[derive(sqlx::FromRow)]
struct MissionRow {
    id: String,
    title: String,
    status: String,
    created_at: String,
    finalized_at: Option<String>,
}

impl TryFrom<MissionRow> for Mission {
    type Error = DomainError;

    fn try_from(row: MissionRow) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| DomainError::SerializationError(e.to_string()))?;
        let status = MissionStatus::from_str(&row.status).ok_or_else(|| {
            DomainError::SerializationError(format!("Invalid mission status: {}", row.status))
        })?;

        let created_at = chrono::DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| DomainError::SerializationError(e.to_string()))?
            .with_timezone(&chrono::Utc);
        let finalized_at = row
            .finalized_at
            .as_deref()
            .map(|s| {
                chrono::DateTime::parse_from_rfc3339(s).map(|d| d.with_timezone(&chrono::Utc))
            })
            .transpose()
            .map_err(|e| DomainError::SerializationError(e.to_string()))?;

        Ok(Mission {
            id,
            title: row.title,
            status,
            created_at,
            finalized_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{all_embedded_migrations, create_test_pool, Migrator};

    async fn setup() -> SqliteMissionStore {
        let pool = create_test_pool().await.unwrap();
        let migrator = Migrator::new(pool.clone());
        migrator
            .run_embedded_migrations(all_embedded_migrations())
            .await
            .unwrap();
        SqliteMissionStore::new(pool)
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = setup().await;
        let mission = Mission::new("First mission");
        store.insert(&mission).await.unwrap();

        let fetched = store.get(mission.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "First mission");
        assert_eq!(fetched.status, MissionStatus::Active);
        assert!(fetched.finalized_at.is_none());
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = setup().await;
        assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_by_status() {
        let store = setup().await;
        store.insert(&Mission::new("a")).await.unwrap();
        store.insert(&Mission::new("b")).await.unwrap();

        let active = store.list(Some(MissionStatus::Active)).await.unwrap();
        assert_eq!(active.len(), 2);

        let failed = store.list(Some(MissionStatus::Failed)).await.unwrap();
        assert!(failed.is_empty());
    }

    #[tokio::test]
    async fn test_empty_title_rejected() {
        let store = setup().await;
        let mission = Mission::new("   ");
        assert!(store.insert(&mission).await.is_err());
    }
}
