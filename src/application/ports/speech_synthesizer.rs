use async_trait::async_trait;

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>, SpeechError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SpeechError {
    #[error("speech request failed: {0}")]
    RequestFailed(String),
    #[error("speech service rate limited")]
    RateLimited,
    #[error("speech authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("speech quota exhausted: {0}")]
    QuotaExhausted(String),
}

impl SpeechError {
    /// Only rejected credentials are final; network, rate and quota failures
    /// get the bounded linear retry.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, SpeechError::AuthenticationFailed(_))
    }
}
