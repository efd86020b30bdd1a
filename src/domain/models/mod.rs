//! Domain models for the Vanguard coordination engine.

pub mod agent_profile;
pub mod config;
pub mod mission;
pub mod step;

pub use agent_profile::AgentProfile;
pub use config::{
    BreakerSettings, Config, DatabaseConfig, ExecutorSettings, RegistrySettings, WorkerSettings,
};
pub use mission::{Mission, MissionOutcome, MissionSignal, MissionStatus};
pub use step::{Step, StepOutcome, StepPayload, StepStatus};
