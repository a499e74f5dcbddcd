use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{LlmClient, LlmClientError};
use crate::application::services::{RetryPolicy, retry_with_backoff};

/// Retries transient failures of the wrapped client. Authentication and quota
/// errors are returned on the first occurrence.
pub struct RetryingLlmClient {
    inner: Arc<dyn LlmClient>,
    policy: RetryPolicy,
}

impl RetryingLlmClient {
    pub fn new(inner: Arc<dyn LlmClient>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl LlmClient for RetryingLlmClient {
    async fn complete(&self, instructions: &str, input: &str) -> Result<String, LlmClientError> {
        retry_with_backoff(&self.policy, "llm_completion", || {
            self.inner.complete(instructions, input)
        })
        .await
    }
}
