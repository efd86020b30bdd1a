//! `vanguard init`: create the database and run migrations.

use anyhow::Result;

use super::open_database;

pub async fn execute(config_path: Option<&str>, json: bool) -> Result<()> {
    let (config, pool) = open_database(config_path).await?;
    pool.close().await;

    if json {
        let payload = serde_json::json!({
            "database": config.database.url,
            "initialized": true,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("Database initialized at {}", config.database.url);
    }
    Ok(())
}
