//! CLI command handlers.

pub mod init;
pub mod mission;
pub mod step;
pub mod work;

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::adapters::sqlite::{all_embedded_migrations, create_pool, Migrator, PoolConfig};
use crate::config::ConfigLoader;
use crate::domain::models::Config;

/// Load config and open a migrated database pool for a command.
pub(crate) async fn open_database(config_path: Option<&str>) -> Result<(Config, SqlitePool)> {
    let config = match config_path {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    let pool = create_pool(
        &config.database.url,
        Some(PoolConfig {
            max_connections: config.database.max_connections,
            ..Default::default()
        }),
    )
    .await
    .context("Failed to open database")?;

    Migrator::new(pool.clone())
        .run_embedded_migrations(all_embedded_migrations())
        .await
        .context("Failed to run migrations")?;

    Ok((config, pool))
}
