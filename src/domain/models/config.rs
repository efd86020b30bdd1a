//! Application configuration model.
//!
//! Loaded hierarchically by [`crate::config::ConfigLoader`]: programmatic
//! defaults, then `vanguard.yaml`, then `VANGUARD_*` environment variables.

use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub worker: WorkerSettings,
    pub breaker: BreakerSettings,
    pub executor: ExecutorSettings,
    pub registry: RegistrySettings,
}

/// SQLite connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx connection URL
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:vanguard.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Worker pool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerSettings {
    /// Number of concurrent workers started by `vanguard work`
    pub count: usize,
    /// Idle interval between loop cycles
    pub poll_interval_ms: u64,
    /// How many pending candidates to fetch per cycle
    pub candidate_batch: usize,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            count: 4,
            poll_interval_ms: 500,
            candidate_batch: 8,
        }
    }
}

/// Fault breaker settings applied to every worker's breaker instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakerSettings {
    /// Consecutive failures before the breaker opens
    pub failure_threshold: u32,
    /// Seconds the breaker stays open before probing
    pub cool_down_secs: u64,
}

impl Default for BreakerSettings {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            cool_down_secs: 300,
        }
    }
}

/// Execution provider settings for the HTTP completion executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorSettings {
    /// Completion endpoint URL
    pub endpoint: String,
    /// Optional model identifier forwarded with each request
    pub model: Option<String>,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/v1/complete".to_string(),
            model: None,
            timeout_secs: 120,
        }
    }
}

/// Agent registry settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    /// YAML file with agent profiles; omitted means an empty registry
    pub agents_file: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.database.url, "sqlite:vanguard.db");
        assert_eq!(config.breaker.failure_threshold, 3);
        assert_eq!(config.breaker.cool_down_secs, 300);
        assert_eq!(config.worker.count, 4);
    }

    #[test]
    fn test_partial_yaml_merges_over_defaults() {
        let yaml = "worker:\n  count: 2\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.worker.count, 2);
        assert_eq!(config.worker.poll_interval_ms, 500);
    }
}
