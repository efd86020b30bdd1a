//! Execution provider adapters.

pub mod http;
pub mod mock;

pub use http::HttpCompletionExecutor;
pub use mock::{MockExecutor, MockResponse};
