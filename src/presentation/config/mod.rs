mod environment;
mod settings;

pub use environment::{ENVIRONMENT_VAR, Environment};
pub use settings::{
    DatabaseSettings, LlmSettings, LoggingSettings, ProcessingSettings, ServerSettings, Settings,
    SpeechSettings, StorageSettings, VoiceSettings,
};
