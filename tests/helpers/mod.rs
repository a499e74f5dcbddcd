#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;

use scriptcast::application::ports::{
    BlobStore, BlobStoreError, CharacterCandidate, CharacterValidator, ClassifierError, LlmClient,
    LlmClientError, ProgressReporter, RepositoryError, SpeechError, SpeechSynthesizer,
    VoicePredictor,
};
use scriptcast::application::services::{
    ActionLineClassifier, CharacterCasting, ScriptPipeline, VoiceCatalog,
};
use scriptcast::domain::{ProcessingStatus, StoragePath, VoiceCategory};
use scriptcast::infrastructure::text_processing::LineSegmenter;

pub const KITCHEN_SCENE: &str = "INT. KITCHEN - DAY\nALICE\nHello there.\n\nBOB\nHi Alice.";

/// Action-line classifier stand-in. Reads the numbered input and answers with
/// every line whose content is listed in `action_texts`.
pub struct ScriptedActionLlm {
    action_texts: Vec<String>,
    failures: Mutex<HashMap<usize, LlmClientError>>,
    pub calls: AtomicUsize,
}

impl ScriptedActionLlm {
    pub fn new(action_texts: &[&str]) -> Self {
        Self {
            action_texts: action_texts.iter().map(|s| s.to_string()).collect(),
            failures: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails the call whose input starts at `first_line`.
    pub fn failing_at(self, first_line: usize, error: LlmClientError) -> Self {
        self.failures.lock().unwrap().insert(first_line, error);
        self
    }
}

#[async_trait]
impl LlmClient for ScriptedActionLlm {
    async fn complete(&self, _instructions: &str, input: &str) -> Result<String, LlmClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut entries = Vec::new();
        let mut first_line = None;
        for numbered in input.split('\n') {
            let (number, content) = numbered.split_once(": ").unwrap_or((numbered.trim_end_matches(':'), ""));
            let number: usize = number.parse().unwrap();
            first_line.get_or_insert(number);
            if self.action_texts.iter().any(|a| a == content.trim()) {
                entries.push(serde_json::json!({ "text": content.trim(), "lineNumber": number }));
            }
        }

        if let Some(error) = first_line.and_then(|l| self.failures.lock().unwrap().remove(&l)) {
            return Err(error);
        }
        Ok(serde_json::Value::Array(entries).to_string())
    }
}

/// Returns canned responses in order.
pub struct CannedLlm {
    responses: Mutex<Vec<Result<String, LlmClientError>>>,
    pub inputs: Mutex<Vec<String>>,
}

impl CannedLlm {
    pub fn new(responses: Vec<Result<String, LlmClientError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().rev().collect()),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(response: &str) -> Self {
        Self::new(vec![Ok(response.to_string())])
    }
}

#[async_trait]
impl LlmClient for CannedLlm {
    async fn complete(&self, _instructions: &str, input: &str) -> Result<String, LlmClientError> {
        self.inputs.lock().unwrap().push(input.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(LlmClientError::InvalidResponse("no canned response".into())))
    }
}

/// Confirms every candidate except the listed names.
pub struct RejectingValidator {
    rejected: Vec<String>,
}

impl RejectingValidator {
    pub fn new(rejected: &[&str]) -> Self {
        Self {
            rejected: rejected.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn accepting_all() -> Self {
        Self::new(&[])
    }
}

#[async_trait]
impl CharacterValidator for RejectingValidator {
    async fn validate(
        &self,
        candidates: &[CharacterCandidate],
    ) -> Result<HashMap<String, bool>, ClassifierError> {
        Ok(candidates
            .iter()
            .map(|c| (c.name.clone(), !self.rejected.contains(&c.name)))
            .collect())
    }
}

pub struct FailingValidator(pub LlmClientError);

#[async_trait]
impl CharacterValidator for FailingValidator {
    async fn validate(
        &self,
        _candidates: &[CharacterCandidate],
    ) -> Result<HashMap<String, bool>, ClassifierError> {
        Err(ClassifierError::Service(self.0.clone()))
    }
}

/// Predicts from a fixed table, defaulting to male.
pub struct TablePredictor {
    table: HashMap<String, VoiceCategory>,
}

impl TablePredictor {
    pub fn new(entries: &[(&str, VoiceCategory)]) -> Self {
        Self {
            table: entries
                .iter()
                .map(|(name, category)| (name.to_string(), *category))
                .collect(),
        }
    }
}

#[async_trait]
impl VoicePredictor for TablePredictor {
    async fn predict(
        &self,
        candidates: &[CharacterCandidate],
    ) -> Result<HashMap<String, VoiceCategory>, ClassifierError> {
        Ok(candidates
            .iter()
            .map(|c| {
                let category = self.table.get(&c.name).copied().unwrap_or(VoiceCategory::Male);
                (c.name.clone(), category)
            })
            .collect())
    }
}

#[derive(Default)]
pub struct RecordingProgress {
    pub checkpoints: Mutex<Vec<(ProcessingStatus, u8, String)>>,
}

#[async_trait]
impl ProgressReporter for RecordingProgress {
    async fn checkpoint(
        &self,
        status: ProcessingStatus,
        progress: u8,
        phase: &str,
    ) -> Result<(), RepositoryError> {
        self.checkpoints
            .lock()
            .unwrap()
            .push((status, progress, phase.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryBlobStore {
    pub objects: Mutex<HashMap<String, Vec<u8>>>,
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, path: &StoragePath, data: Bytes) -> Result<u64, BlobStoreError> {
        let size = data.len() as u64;
        self.objects
            .lock()
            .unwrap()
            .insert(path.as_str().to_string(), data.to_vec());
        Ok(size)
    }

    async fn fetch(&self, path: &StoragePath) -> Result<Vec<u8>, BlobStoreError> {
        self.objects
            .lock()
            .unwrap()
            .get(path.as_str())
            .cloned()
            .ok_or_else(|| BlobStoreError::NotFound(path.to_string()))
    }

    async fn delete(&self, path: &StoragePath) -> Result<(), BlobStoreError> {
        self.objects.lock().unwrap().remove(path.as_str());
        Ok(())
    }

    fn url_for(&self, path: &StoragePath) -> String {
        format!("memory://{}", path)
    }
}

/// Fails the first `failures` calls with the given error, then returns the
/// voice id as audio bytes.
pub struct FlakySpeech {
    failures: usize,
    error: SpeechError,
    pub calls: AtomicUsize,
}

impl FlakySpeech {
    pub fn new(failures: usize, error: SpeechError) -> Self {
        Self {
            failures,
            error,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn healthy() -> Self {
        Self::new(0, SpeechError::RateLimited)
    }
}

#[async_trait]
impl SpeechSynthesizer for FlakySpeech {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>, SpeechError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(self.error.clone());
        }
        Ok(format!("{voice_id}:{text}").into_bytes())
    }
}

pub fn catalog() -> VoiceCatalog {
    VoiceCatalog::new(
        vec!["m1".to_string(), "m2".to_string()],
        vec!["f1".to_string(), "f2".to_string()],
    )
    .unwrap()
}

pub fn pipeline(
    llm: std::sync::Arc<dyn LlmClient>,
    validator: std::sync::Arc<dyn CharacterValidator>,
    predictor: std::sync::Arc<dyn VoicePredictor>,
    max_chunk_size: usize,
) -> ScriptPipeline {
    ScriptPipeline::new(
        std::sync::Arc::new(LineSegmenter::new(max_chunk_size).unwrap()),
        ActionLineClassifier::new(llm),
        CharacterCasting::new(validator, predictor, catalog()),
        60,
    )
}
