use std::sync::Arc;

use super::action_line_classifier::{ActionLineClassifier, ClassificationError};
use super::character_casting::{CastingError, CharacterCasting};
use super::chunk_merger::{MergeError, merge_chunk};
use super::line_classifier::{ParserState, classify_chunk};
use super::line_sequencer::finalize;
use crate::application::ports::{
    BlobStoreError, FileLoaderError, ProgressReporter, RepositoryError, TextSplitter,
    TextSplitterError,
};
use crate::domain::{ProcessingStatus, ScriptAnalysis, SkippedChunk, VoiceAssignments};

const PROGRESS_SEGMENTED: u8 = 15;
const PROGRESS_CHUNKS_DONE: u8 = 70;
const PROGRESS_VALIDATING: u8 = 75;
const PROGRESS_SEQUENCING: u8 = 85;
const PROGRESS_CASTING: u8 = 90;

#[derive(Debug)]
pub struct PipelineOutput {
    pub analysis: ScriptAnalysis,
    pub voice_assignments: VoiceAssignments,
}

/// Turns extracted script text into the finalized [`ScriptAnalysis`].
///
/// Chunks are classified and merged one at a time, in order, with the
/// document threaded through as an accumulator. A chunk whose classification
/// fails is recorded and skipped; merge failures and fatal service errors end
/// the run.
pub struct ScriptPipeline {
    splitter: Arc<dyn TextSplitter>,
    action_classifier: ActionLineClassifier,
    casting: CharacterCasting,
    lines_per_minute: u32,
}

impl ScriptPipeline {
    pub fn new(
        splitter: Arc<dyn TextSplitter>,
        action_classifier: ActionLineClassifier,
        casting: CharacterCasting,
        lines_per_minute: u32,
    ) -> Self {
        Self {
            splitter,
            action_classifier,
            casting,
            lines_per_minute,
        }
    }

    pub async fn run(
        &self,
        text: &str,
        progress: &dyn ProgressReporter,
    ) -> Result<PipelineOutput, ProcessingError> {
        if text.trim().is_empty() {
            return Err(ProcessingError::EmptyText);
        }

        let chunks = self.splitter.split(text)?;
        tracing::info!(chunks = chunks.len(), "Script segmented");
        progress
            .checkpoint(ProcessingStatus::Processing, PROGRESS_SEGMENTED, "segmenting")
            .await?;

        let mut document = ScriptAnalysis::new();
        let mut carried = ParserState::new();
        let total = chunks.len();

        for (chunk_index, chunk) in chunks.iter().enumerate() {
            let classified = if chunk.text.trim().is_empty() {
                Ok(Vec::new())
            } else {
                self.action_classifier.classify(chunk).await
            };
            match classified {
                Ok(actions) => {
                    let (result, next) = classify_chunk(chunk, actions, carried);
                    carried = next;
                    document = merge_chunk(document, result).map_err(|source| {
                        ProcessingError::Merge {
                            chunk_index,
                            source,
                        }
                    })?;
                }
                Err(source) if source.is_fatal() => {
                    return Err(ProcessingError::Classification {
                        chunk_index,
                        source,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        chunk_index,
                        start_line = chunk.start_line,
                        error = %e,
                        "Chunk classification failed, skipping chunk"
                    );
                    document.metadata.skipped_chunks.push(SkippedChunk {
                        chunk_index,
                        start_line: chunk.start_line,
                        error: e.to_string(),
                    });
                    carried = ParserState::new();
                }
            }

            progress
                .checkpoint(
                    ProcessingStatus::Processing,
                    chunk_progress(chunk_index + 1, total),
                    "classifying",
                )
                .await?;
        }

        progress
            .checkpoint(
                ProcessingStatus::Validating,
                PROGRESS_VALIDATING,
                "validating characters",
            )
            .await?;
        self.casting.validate(&mut document).await?;
        if document.characters.is_empty() {
            return Err(ProcessingError::NoCharactersDetected {
                skipped_chunks: document.metadata.skipped_chunks.len(),
            });
        }

        progress
            .checkpoint(
                ProcessingStatus::Validating,
                PROGRESS_SEQUENCING,
                "sequencing lines",
            )
            .await?;
        let analysis = finalize(document, self.lines_per_minute);

        progress
            .checkpoint(
                ProcessingStatus::Validating,
                PROGRESS_CASTING,
                "assigning voices",
            )
            .await?;
        let voice_assignments = self.casting.assign_voices(&analysis.characters).await?;

        tracing::info!(
            characters = analysis.characters.len(),
            scenes = analysis.scenes.len(),
            action_lines = analysis.action_lines.len(),
            total_lines = analysis.metadata.total_lines,
            skipped_chunks = analysis.metadata.skipped_chunks.len(),
            "Script analysis complete"
        );

        Ok(PipelineOutput {
            analysis,
            voice_assignments,
        })
    }
}

fn chunk_progress(done: usize, total: usize) -> u8 {
    let span = (PROGRESS_CHUNKS_DONE - PROGRESS_SEGMENTED) as usize;
    PROGRESS_SEGMENTED + (span * done / total.max(1)) as u8
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("file loading: {0}")]
    FileLoading(#[from] FileLoaderError),
    #[error("script text is empty")]
    EmptyText,
    #[error("segmentation: {0}")]
    Segmentation(#[from] TextSplitterError),
    #[error("chunk {chunk_index}: {source}")]
    Classification {
        chunk_index: usize,
        source: ClassificationError,
    },
    #[error("merging chunk {chunk_index}: {source}")]
    Merge {
        chunk_index: usize,
        source: MergeError,
    },
    #[error("{0}")]
    Casting(#[from] CastingError),
    #[error("no speaking characters detected ({skipped_chunks} chunks skipped)")]
    NoCharactersDetected { skipped_chunks: usize },
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
    #[error("storage: {0}")]
    Storage(#[from] BlobStoreError),
}
