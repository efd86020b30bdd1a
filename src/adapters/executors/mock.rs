//! Mock executor for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::models::Step;
use crate::domain::ports::{ExecutorError, StepExecutor};

/// Mock response configuration.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// Output returned on success
    pub output: serde_json::Value,
    /// Whether to simulate failure
    pub fail: bool,
    /// Error message if failing
    pub error_message: Option<String>,
}

impl Default for MockResponse {
    fn default() -> Self {
        Self {
            output: serde_json::json!({"result": "ok"}),
            fail: false,
            error_message: None,
        }
    }
}

impl MockResponse {
    pub fn success(output: serde_json::Value) -> Self {
        Self {
            output,
            ..Default::default()
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            fail: true,
            error_message: Some(error.into()),
            ..Default::default()
        }
    }
}

/// Mock executor with scripted per-step outcomes and call counting.
pub struct MockExecutor {
    default_response: MockResponse,
    response_overrides: Arc<RwLock<HashMap<Uuid, MockResponse>>>,
    call_count: Arc<AtomicUsize>,
}

impl Default for MockExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExecutor {
    pub fn new() -> Self {
        Self {
            default_response: MockResponse::default(),
            response_overrides: Arc::new(RwLock::new(HashMap::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_default_response(response: MockResponse) -> Self {
        Self {
            default_response: response,
            response_overrides: Arc::new(RwLock::new(HashMap::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Set a specific response for a step ID.
    pub async fn set_response_for_step(&self, step_id: Uuid, response: MockResponse) {
        let mut overrides = self.response_overrides.write().await;
        overrides.insert(step_id, response);
    }

    /// How many times `execute` was called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StepExecutor for MockExecutor {
    async fn execute(&self, step: &Step) -> Result<serde_json::Value, ExecutorError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        let response = {
            let overrides = self.response_overrides.read().await;
            overrides
                .get(&step.id)
                .cloned()
                .unwrap_or_else(|| self.default_response.clone())
        };

        if response.fail {
            let message = response
                .error_message
                .unwrap_or_else(|| "mock failure".to_string());
            return Err(ExecutorError::Request(message));
        }

        Ok(response.output)
    }
}
