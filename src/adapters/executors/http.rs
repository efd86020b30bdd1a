//! HTTP completion executor.
//!
//! Posts a step's prompt to a text-generation endpoint and extracts the
//! single JSON value from the raw completion text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::models::{ExecutorSettings, Step};
use crate::domain::ports::{ExecutorError, StepExecutor};
use crate::services::extraction::extract_json;

#[derive(Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    input: Option<&'a serde_json::Value>,
}

#[derive(Deserialize)]
struct CompletionResponse {
    completion: String,
}

/// Executor backed by a remote completion endpoint.
pub struct HttpCompletionExecutor {
    client: reqwest::Client,
    endpoint: String,
    model: Option<String>,
}

impl HttpCompletionExecutor {
    pub fn new(settings: &ExecutorSettings) -> Result<Self, ExecutorError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ExecutorError::Request(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
        })
    }
}

#[async_trait]
impl StepExecutor for HttpCompletionExecutor {
    async fn execute(&self, step: &Step) -> Result<serde_json::Value, ExecutorError> {
        let request = CompletionRequest {
            prompt: &step.payload.prompt,
            model: self.model.as_deref(),
            input: step.payload.input.as_ref(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| ExecutorError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExecutorError::Request(format!(
                "provider returned status {status}"
            )));
        }

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ExecutorError::Output(format!("malformed provider response: {e}")))?;

        extract_json(&body.completion).map_err(|e| ExecutorError::Output(e.to_string()))
    }
}
