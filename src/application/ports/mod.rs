mod blob_store;
mod character_classifier;
mod file_loader;
mod llm_client;
mod progress_reporter;
mod repository_error;
mod script_repository;
mod speech_synthesizer;
mod text_splitter;

pub use blob_store::{BlobStore, BlobStoreError};
pub use character_classifier::{
    CharacterCandidate, CharacterValidator, ClassifierError, VoicePredictor,
};
pub use file_loader::{FileLoader, FileLoaderError};
pub use llm_client::{LlmClient, LlmClientError};
pub use progress_reporter::ProgressReporter;
pub use repository_error::RepositoryError;
pub use script_repository::ScriptRepository;
pub use speech_synthesizer::{SpeechError, SpeechSynthesizer};
pub use text_splitter::{TextSplitter, TextSplitterError};
