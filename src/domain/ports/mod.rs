//! Ports (trait interfaces) between the domain and its adapters.

pub mod executor;
pub mod mission_store;
pub mod step_store;

pub use executor::{ExecutorError, StepExecutor};
pub use mission_store::MissionStore;
pub use step_store::{StepFilter, StepStore};
