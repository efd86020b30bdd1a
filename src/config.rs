//! Configuration loading with hierarchical merging.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid worker count: {0}. Must be between 1 and 64")]
    InvalidWorkerCount(usize),

    #[error("Invalid poll interval: {0}ms. Must be positive")]
    InvalidPollInterval(u64),

    #[error("Invalid candidate batch: {0}. Must be at least 1")]
    InvalidCandidateBatch(usize),

    #[error("Invalid failure threshold: {0}. Must be at least 1")]
    InvalidFailureThreshold(u32),

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Database URL cannot be empty")]
    EmptyDatabaseUrl,
}

/// Configuration loader with hierarchical merging.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. `vanguard.yaml` in the working directory
    /// 3. Environment variables (`VANGUARD_*` prefix)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file("vanguard.yaml"))
            .merge(Env::prefixed("VANGUARD_").split("__"))
            .extract()
            .context("Failed to extract configuration")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context("Failed to extract configuration")?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.url.trim().is_empty() {
            return Err(ConfigError::EmptyDatabaseUrl);
        }
        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
            ));
        }
        if config.worker.count == 0 || config.worker.count > 64 {
            return Err(ConfigError::InvalidWorkerCount(config.worker.count));
        }
        if config.worker.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidPollInterval(
                config.worker.poll_interval_ms,
            ));
        }
        if config.worker.candidate_batch == 0 {
            return Err(ConfigError::InvalidCandidateBatch(
                config.worker.candidate_batch,
            ));
        }
        if config.breaker.failure_threshold == 0 {
            return Err(ConfigError::InvalidFailureThreshold(
                config.breaker.failure_threshold,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Config;

    #[test]
    fn test_defaults_pass_validation() {
        assert!(ConfigLoader::validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_worker_count_rejected() {
        let mut config = Config::default();
        config.worker.count = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidWorkerCount(0))
        ));
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let mut config = Config::default();
        config.breaker.failure_threshold = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidFailureThreshold(0))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "worker:\n  count: 2\n  poll_interval_ms: 100\n").unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.worker.count, 2);
        assert_eq!(config.worker.poll_interval_ms, 100);
        // Untouched sections keep their defaults.
        assert_eq!(config.breaker.failure_threshold, 3);
    }
}
