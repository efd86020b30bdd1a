//! Vanguard - Mission/Step Coordination Engine
//!
//! Vanguard coordinates a pool of workers over a queue of mission steps,
//! guaranteeing single ownership of every step and exactly-once mission
//! finalization under concurrent completion.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, errors, and the port traits
//! - **Service Layer** (`services`): Worker loop, fault breaker, registry
//! - **Adapter Layer** (`adapters`): SQLite stores and step executors
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use vanguard::services::{Worker, WorkerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     // Build a store and executor, then drive a worker loop
//!     let mut worker = Worker::new("worker-0", store, executor, WorkerConfig::default());
//!     worker.run(shutdown_rx).await;
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    Config, Mission, MissionOutcome, MissionSignal, MissionStatus, Step, StepOutcome, StepStatus,
};
pub use services::extraction::{extract_json, ExtractionError};
pub use services::fault_breaker::{BreakerState, FaultBreaker, FaultBreakerConfig};
pub use services::registry::AgentRegistry;
pub use services::worker::{TickOutcome, Worker, WorkerConfig};
