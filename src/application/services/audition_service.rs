use std::collections::BTreeMap;
use std::sync::Arc;

use bytes::Bytes;
use futures::{StreamExt, TryStreamExt, stream};

use super::retry::{RetryPolicy, retry_with_backoff};
use crate::application::ports::{BlobStore, BlobStoreError, SpeechError, SpeechSynthesizer};
use crate::domain::{ScriptAnalysis, ScriptId, StoragePath, VoiceAssignment, VoiceAssignments};

const AUDITION_CLIP: &str = "audition";

/// Renders assigned voices through the speech-synthesis collaborator and
/// stores the audio.
pub struct AuditionService {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    blob_store: Arc<dyn BlobStore>,
    retry_policy: RetryPolicy,
    concurrency: usize,
}

struct LineJob {
    character_index: usize,
    dialogue_index: usize,
    character: String,
    line_number: usize,
    text: String,
    voice_id: String,
}

impl AuditionService {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        blob_store: Arc<dyn BlobStore>,
        retry_policy: RetryPolicy,
        concurrency: usize,
    ) -> Self {
        Self {
            synthesizer,
            blob_store,
            retry_policy,
            concurrency: concurrency.max(1),
        }
    }

    /// One audition clip per (character, voice). Returns urls by character name.
    #[tracing::instrument(skip(self, assignments), fields(characters = assignments.len()))]
    pub async fn audition(
        &self,
        script_id: ScriptId,
        assignments: &VoiceAssignments,
    ) -> Result<BTreeMap<String, String>, AuditionError> {
        stream::iter(assignments.clone())
            .map(|(name, assignment)| async move {
                self.audition_one(script_id, &name, &assignment).await
            })
            .buffer_unordered(self.concurrency)
            .try_collect()
            .await
    }

    /// Voices every dialogue line of assigned characters and records the url
    /// under the voice id on the dialogue entry and its processed line.
    /// Returns the number of clips produced.
    #[tracing::instrument(skip(self, analysis, assignments))]
    pub async fn voice_dialogue(
        &self,
        script_id: ScriptId,
        analysis: &mut ScriptAnalysis,
        assignments: &VoiceAssignments,
    ) -> Result<usize, AuditionError> {
        let mut jobs = Vec::new();
        for (character_index, character) in analysis.characters.iter().enumerate() {
            let Some(assignment) = assignments.get(&character.name) else {
                continue;
            };
            for (dialogue_index, line) in character.dialogue.iter().enumerate() {
                jobs.push(LineJob {
                    character_index,
                    dialogue_index,
                    character: character.name.clone(),
                    line_number: line.line_number,
                    text: line.text.clone(),
                    voice_id: assignment.voice_id.clone(),
                });
            }
        }

        let rendered: Vec<(LineJob, String)> = stream::iter(jobs)
            .map(|job| async move {
                let clip = format!("line-{}", job.line_number);
                let url = self
                    .render(script_id, &job.character, &job.voice_id, &job.text, &clip)
                    .await?;
                Ok::<_, AuditionError>((job, url))
            })
            .buffer_unordered(self.concurrency)
            .try_collect()
            .await?;

        let count = rendered.len();
        for (job, url) in rendered {
            let character = &mut analysis.characters[job.character_index];
            let character_id = character.key();
            let line = &mut character.dialogue[job.dialogue_index];
            line.voices
                .get_or_insert_with(BTreeMap::new)
                .insert(job.voice_id.clone(), url.clone());

            if let Some(processed) = analysis.processed_lines.iter_mut().find(|p| {
                p.character_id == character_id && p.original_line_number == job.line_number
            }) {
                processed
                    .voices
                    .get_or_insert_with(BTreeMap::new)
                    .insert(job.voice_id, url);
            }
        }

        tracing::info!(clips = count, "Dialogue voicing complete");
        Ok(count)
    }

    async fn audition_one(
        &self,
        script_id: ScriptId,
        name: &str,
        assignment: &VoiceAssignment,
    ) -> Result<(String, String), AuditionError> {
        let url = self
            .render(
                script_id,
                name,
                &assignment.voice_id,
                &assignment.test_text,
                AUDITION_CLIP,
            )
            .await?;
        Ok((name.to_string(), url))
    }

    async fn render(
        &self,
        script_id: ScriptId,
        character: &str,
        voice_id: &str,
        text: &str,
        clip: &str,
    ) -> Result<String, AuditionError> {
        let audio = retry_with_backoff(&self.retry_policy, "speech_synthesis", || {
            self.synthesizer.synthesize(text, voice_id)
        })
        .await?;

        let path = StoragePath::audio(&script_id, character, voice_id, clip);
        self.blob_store.put(&path, Bytes::from(audio)).await?;
        Ok(self.blob_store.url_for(&path))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuditionError {
    #[error("speech synthesis: {0}")]
    Speech(#[from] SpeechError),
    #[error("storage: {0}")]
    Storage(#[from] BlobStoreError),
}
