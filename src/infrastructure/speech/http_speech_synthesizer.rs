use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::application::ports::{SpeechError, SpeechSynthesizer};

/// Text-to-speech over HTTP (ElevenLabs-style `POST /v1/text-to-speech/{voice}`
/// returning `audio/mpeg`).
pub struct HttpSpeechSynthesizer {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

impl HttpSpeechSynthesizer {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

pub fn classify_speech_failure(status: StatusCode, body: &str) -> SpeechError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            if body.contains("quota_exceeded") {
                SpeechError::QuotaExhausted(body.to_string())
            } else {
                SpeechError::AuthenticationFailed(format!("HTTP {}", status))
            }
        }
        StatusCode::PAYMENT_REQUIRED => SpeechError::QuotaExhausted(body.to_string()),
        StatusCode::TOO_MANY_REQUESTS => SpeechError::RateLimited,
        _ => SpeechError::RequestFailed(format!("HTTP {}: {}", status, body)),
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSpeechSynthesizer {
    #[tracing::instrument(skip(self, text), fields(chars = text.len()))]
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>, SpeechError> {
        let response = self
            .client
            .post(format!("{}/v1/text-to-speech/{}", self.base_url, voice_id))
            .header("xi-api-key", &self.api_key)
            .header("accept", "audio/mpeg")
            .json(&SynthesisRequest {
                text,
                model_id: &self.model,
            })
            .send()
            .await
            .map_err(|e| SpeechError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(classify_speech_failure(status, &body));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| SpeechError::RequestFailed(format!("read audio: {}", e)))?;

        tracing::debug!(bytes = audio.len(), "Speech synthesized");
        Ok(audio.to_vec())
    }
}
