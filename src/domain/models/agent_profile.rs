//! Static per-agent configuration supplied by the registry.

use serde::{Deserialize, Serialize};

/// Static configuration for one logical actor, keyed by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    /// Unique agent name
    pub name: String,
    /// Capability flags (free-form, matched by the selection layer)
    #[serde(default)]
    pub capabilities: Vec<String>,
    /// Minimum seconds between actions by this agent
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
    /// Upper bound on steps this agent may hold at once
    #[serde(default = "default_max_concurrent_steps")]
    pub max_concurrent_steps: u32,
}

fn default_cooldown_secs() -> u64 {
    30
}

fn default_max_concurrent_steps() -> u32 {
    1
}

impl AgentProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capabilities: Vec::new(),
            cooldown_secs: default_cooldown_secs(),
            max_concurrent_steps: default_max_concurrent_steps(),
        }
    }

    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.push(capability.into());
        self
    }

    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }
}
