//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

use std::sync::Arc;

use vanguard::adapters::sqlite::{
    all_embedded_migrations, create_test_pool, Migrator, SqliteMissionStore, SqliteStepStore,
};
use vanguard::domain::models::{Mission, Step};
use vanguard::domain::ports::{MissionStore, StepStore};

/// Create an in-memory migrated database with both stores.
pub async fn setup_stores() -> (Arc<SqliteStepStore>, SqliteMissionStore) {
    let pool = create_test_pool().await.expect("failed to create test pool");
    Migrator::new(pool.clone())
        .run_embedded_migrations(all_embedded_migrations())
        .await
        .expect("failed to run migrations");
    (
        Arc::new(SqliteStepStore::new(pool.clone())),
        SqliteMissionStore::new(pool),
    )
}

/// Insert a mission with `count` pending steps and return it with the steps.
pub async fn seed_mission(
    steps: &SqliteStepStore,
    missions: &SqliteMissionStore,
    title: &str,
    count: usize,
) -> (Mission, Vec<Step>) {
    let mission = Mission::new(title);
    missions
        .insert(&mission)
        .await
        .expect("failed to insert mission");

    let mut created = Vec::with_capacity(count);
    for n in 0..count {
        let step = Step::new(mission.id, format!("step-{n}"), format!("prompt {n}"));
        steps.insert(&step).await.expect("failed to insert step");
        created.push(step);
    }
    (mission, created)
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
