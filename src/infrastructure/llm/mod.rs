mod llm_character_classifier;
mod openai_client;
mod retrying_llm_client;

pub use llm_character_classifier::{
    LlmCharacterClassifier, PREDICTION_INSTRUCTIONS, VALIDATION_INSTRUCTIONS, parse_name_map,
};
pub use openai_client::{OpenAiClient, classify_http_failure};
pub use retrying_llm_client::RetryingLlmClient;
