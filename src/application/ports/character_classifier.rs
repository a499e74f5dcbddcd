use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;

use super::LlmClientError;
use crate::domain::VoiceCategory;

/// What the classifiers see of a detected character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterCandidate {
    pub name: String,
    pub first_line: String,
}

/// Boolean-classification collaborator: is each name a real speaking character?
#[async_trait]
pub trait CharacterValidator: Send + Sync {
    async fn validate(
        &self,
        candidates: &[CharacterCandidate],
    ) -> Result<HashMap<String, bool>, ClassifierError>;
}

/// Attribute-prediction collaborator selecting each character's voice pool.
#[async_trait]
pub trait VoicePredictor: Send + Sync {
    async fn predict(
        &self,
        candidates: &[CharacterCandidate],
    ) -> Result<HashMap<String, VoiceCategory>, ClassifierError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("classifier service: {0}")]
    Service(#[from] LlmClientError),
    #[error("malformed classifier response: {0}")]
    MalformedResponse(String),
    #[error("classifier returned an empty response")]
    EmptyResponse,
}
