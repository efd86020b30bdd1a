//! Agent registry.
//!
//! An owned container of static agent configuration. Uniqueness of names
//! is enforced at insertion; consumers only get read access.

use std::collections::HashMap;
use std::path::Path;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::AgentProfile;

/// Registry of agent profiles keyed by unique name.
#[derive(Debug, Default)]
pub struct AgentRegistry {
    profiles: HashMap<String, AgentProfile>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load profiles from a YAML file containing a list of agents.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> DomainResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| DomainError::ValidationFailed(format!("Cannot read agents file: {e}")))?;
        let profiles: Vec<AgentProfile> = serde_yaml::from_str(&text)
            .map_err(|e| DomainError::SerializationError(e.to_string()))?;

        let mut registry = Self::new();
        for profile in profiles {
            registry.insert(profile)?;
        }
        Ok(registry)
    }

    /// Insert a profile, rejecting duplicate names.
    pub fn insert(&mut self, profile: AgentProfile) -> DomainResult<()> {
        if profile.name.trim().is_empty() {
            return Err(DomainError::ValidationFailed(
                "Agent name cannot be empty".to_string(),
            ));
        }
        if self.profiles.contains_key(&profile.name) {
            return Err(DomainError::DuplicateAgent(profile.name));
        }
        self.profiles.insert(profile.name.clone(), profile);
        Ok(())
    }

    /// Look up a profile by name.
    pub fn get(&self, name: &str) -> Option<&AgentProfile> {
        self.profiles.get(name)
    }

    /// Look up a profile by name, erroring when absent.
    pub fn require(&self, name: &str) -> DomainResult<&AgentProfile> {
        self.get(name)
            .ok_or_else(|| DomainError::AgentNotFound(name.to_string()))
    }

    /// Registered names, sorted for stable output.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
