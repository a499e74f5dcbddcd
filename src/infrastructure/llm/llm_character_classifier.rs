use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::application::ports::{
    CharacterCandidate, CharacterValidator, ClassifierError, LlmClient, VoicePredictor,
};
use crate::application::services::strip_code_fence;
use crate::domain::VoiceCategory;

pub const VALIDATION_INSTRUCTIONS: &str = "You receive names detected as character cues in a \
screenplay, each with the first line they speak. Decide for every name whether it is a real \
speaking character, as opposed to a transition, camera direction, scene heading or other stage \
direction (for example \"FADE OUT\", \"CUT TO:\", \"CONTINUED\"). Respond with a JSON object \
mapping every given name, spelled exactly as given, to true or false. No commentary.";

pub const PREDICTION_INSTRUCTIONS: &str = "You receive screenplay characters, each with the \
first line they speak. For every character predict the voice that best fits them, either \
\"male\" or \"female\". Respond with a JSON object mapping every given name, spelled exactly as \
given, to \"male\" or \"female\". No commentary.";

/// Character validation and voice-category prediction backed by the LLM client.
pub struct LlmCharacterClassifier {
    llm_client: Arc<dyn LlmClient>,
}

impl LlmCharacterClassifier {
    pub fn new(llm_client: Arc<dyn LlmClient>) -> Self {
        Self { llm_client }
    }

    async fn ask<T: DeserializeOwned>(
        &self,
        instructions: &str,
        candidates: &[CharacterCandidate],
    ) -> Result<HashMap<String, T>, ClassifierError> {
        let input = serde_json::to_string(candidates)
            .map_err(|e| ClassifierError::MalformedResponse(e.to_string()))?;
        let response = self.llm_client.complete(instructions, &input).await?;
        parse_name_map(&response)
    }
}

/// Parses a `{name: value}` JSON object, tolerating a code fence around it.
pub fn parse_name_map<T: DeserializeOwned>(
    response: &str,
) -> Result<HashMap<String, T>, ClassifierError> {
    let payload = strip_code_fence(response);
    if payload.is_empty() {
        return Err(ClassifierError::EmptyResponse);
    }
    let map: HashMap<String, T> = serde_json::from_str(payload)
        .map_err(|e| ClassifierError::MalformedResponse(e.to_string()))?;
    if map.is_empty() {
        return Err(ClassifierError::EmptyResponse);
    }
    Ok(map)
}

#[async_trait]
impl CharacterValidator for LlmCharacterClassifier {
    #[tracing::instrument(skip(self, candidates), fields(candidates = candidates.len()))]
    async fn validate(
        &self,
        candidates: &[CharacterCandidate],
    ) -> Result<HashMap<String, bool>, ClassifierError> {
        self.ask(VALIDATION_INSTRUCTIONS, candidates).await
    }
}

#[async_trait]
impl VoicePredictor for LlmCharacterClassifier {
    #[tracing::instrument(skip(self, candidates), fields(candidates = candidates.len()))]
    async fn predict(
        &self,
        candidates: &[CharacterCandidate],
    ) -> Result<HashMap<String, VoiceCategory>, ClassifierError> {
        let raw: HashMap<String, String> = self.ask(PREDICTION_INSTRUCTIONS, candidates).await?;
        raw.into_iter()
            .map(|(name, category)| {
                category
                    .parse::<VoiceCategory>()
                    .map(|c| (name, c))
                    .map_err(ClassifierError::MalformedResponse)
            })
            .collect()
    }
}
