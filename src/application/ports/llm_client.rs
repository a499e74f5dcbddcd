use async_trait::async_trait;

/// Text-classification collaborator. `instructions` go in the system role and
/// `input` is the material to classify; the reply is raw model text.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, instructions: &str, input: &str) -> Result<String, LlmClientError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmClientError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("quota exhausted: {0}")]
    QuotaExhausted(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl LlmClientError {
    /// Rate limits and transport failures may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmClientError::RateLimited | LlmClientError::ApiRequestFailed(_)
        )
    }

    /// Errors that must abort the whole job instead of skipping a chunk.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            LlmClientError::AuthenticationFailed(_) | LlmClientError::QuotaExhausted(_)
        )
    }
}
