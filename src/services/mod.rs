//! Service layer: the coordination core and its utilities.

pub mod affinity;
pub mod extraction;
pub mod fault_breaker;
pub mod registry;
pub mod worker;

pub use affinity::{clamp_affinity_delta, MAX_AFFINITY_SHIFT};
pub use extraction::{extract_json, ExtractionError};
pub use fault_breaker::{BreakerSnapshot, BreakerState, FaultBreaker, FaultBreakerConfig};
pub use registry::AgentRegistry;
pub use worker::{TickOutcome, Worker, WorkerConfig};
