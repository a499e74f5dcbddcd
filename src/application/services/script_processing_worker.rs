use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::Instrument;

use super::script_pipeline::{PipelineOutput, ProcessingError, ScriptPipeline};
use crate::application::ports::{
    BlobStore, FileLoader, ProgressReporter, RepositoryError, ScriptRepository,
};
use crate::domain::{ProcessingStatus, ScriptDocument, ScriptId, StoragePath};

const PROGRESS_EXTRACTED: u8 = 10;

pub struct ScriptJobMessage {
    pub document: ScriptDocument,
    pub storage_path: StoragePath,
}

/// Consumes queued scripts one at a time and drives each through the
/// pipeline, keeping the status record current.
pub struct ScriptProcessingWorker {
    receiver: mpsc::Receiver<ScriptJobMessage>,
    file_loader: Arc<dyn FileLoader>,
    blob_store: Arc<dyn BlobStore>,
    repository: Arc<dyn ScriptRepository>,
    pipeline: Arc<ScriptPipeline>,
}

impl ScriptProcessingWorker {
    pub fn new(
        receiver: mpsc::Receiver<ScriptJobMessage>,
        file_loader: Arc<dyn FileLoader>,
        blob_store: Arc<dyn BlobStore>,
        repository: Arc<dyn ScriptRepository>,
        pipeline: Arc<ScriptPipeline>,
    ) -> Self {
        Self {
            receiver,
            file_loader,
            blob_store,
            repository,
            pipeline,
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Script processing worker started");
        while let Some(msg) = self.receiver.recv().await {
            let span = tracing::info_span!(
                "script_job",
                script_id = %msg.document.id,
                filename = %msg.document.filename,
            );

            if let Err(e) = self.process_job(msg).instrument(span).await {
                tracing::error!(error = %e, "Script processing job failed");
            }
        }
        tracing::info!("Script processing worker stopped: channel closed");
    }

    pub async fn process_job(&self, msg: ScriptJobMessage) -> Result<(), ProcessingError> {
        let script_id = msg.document.id;
        let progress = JobProgress::new(Arc::clone(&self.repository), script_id);

        match self
            .repository
            .start_processing(script_id, "extracting text")
            .await
        {
            Ok(()) => {}
            Err(RepositoryError::ConstraintViolation(reason)) => {
                tracing::warn!(reason = %reason, "Script is not in a startable state, ignoring message");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }

        match self.process_pipeline(&msg, &progress).await {
            Ok(output) => {
                self.repository
                    .save_analysis(script_id, &output.analysis)
                    .await?;
                self.repository
                    .save_voice_assignments(script_id, &output.voice_assignments)
                    .await?;
                self.repository
                    .update_status(script_id, ProcessingStatus::Completed, 100, "completed", None)
                    .await?;
                tracing::info!(
                    total_lines = output.analysis.metadata.total_lines,
                    "Script processing completed"
                );
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                self.repository
                    .update_status(
                        script_id,
                        ProcessingStatus::Error,
                        progress.last(),
                        "failed",
                        Some(&message),
                    )
                    .await?;
                Err(e)
            }
        }
    }

    async fn process_pipeline(
        &self,
        msg: &ScriptJobMessage,
        progress: &JobProgress,
    ) -> Result<PipelineOutput, ProcessingError> {
        let data = self.blob_store.fetch(&msg.storage_path).await?;
        let text = self.file_loader.extract_text(&data, &msg.document).await?;
        tracing::debug!(chars = text.len(), "Script text extracted");

        progress
            .checkpoint(ProcessingStatus::Processing, PROGRESS_EXTRACTED, "text extracted")
            .await?;

        self.pipeline.run(&text, progress).await
    }
}

/// Writes checkpoints for one script to the status record.
pub struct JobProgress {
    repository: Arc<dyn ScriptRepository>,
    script_id: ScriptId,
    last: AtomicU8,
}

impl JobProgress {
    pub fn new(repository: Arc<dyn ScriptRepository>, script_id: ScriptId) -> Self {
        Self {
            repository,
            script_id,
            last: AtomicU8::new(0),
        }
    }

    pub fn last(&self) -> u8 {
        self.last.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ProgressReporter for JobProgress {
    async fn checkpoint(
        &self,
        status: ProcessingStatus,
        progress: u8,
        phase: &str,
    ) -> Result<(), RepositoryError> {
        tracing::debug!(status = %status, progress, phase, "Job checkpoint");
        self.repository
            .update_status(self.script_id, status, progress, phase, None)
            .await?;
        self.last.store(progress, Ordering::Relaxed);
        Ok(())
    }
}
