use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;

use super::script_processing_worker::ScriptJobMessage;
use crate::application::ports::{BlobStore, BlobStoreError, RepositoryError, ScriptRepository};
use crate::domain::{
    ContentType, ProcessingJob, ProcessingStatus, ScriptDocument, ScriptId, StoragePath,
};

/// Accepts uploaded scripts: stores the file, opens the status record and
/// queues the job for the worker.
pub struct ScriptSubmissionService {
    repository: Arc<dyn ScriptRepository>,
    blob_store: Arc<dyn BlobStore>,
    sender: mpsc::Sender<ScriptJobMessage>,
}

impl ScriptSubmissionService {
    pub fn new(
        repository: Arc<dyn ScriptRepository>,
        blob_store: Arc<dyn BlobStore>,
        sender: mpsc::Sender<ScriptJobMessage>,
    ) -> Self {
        Self {
            repository,
            blob_store,
            sender,
        }
    }

    #[tracing::instrument(skip(self, data), fields(bytes = data.len()))]
    pub async fn submit(
        &self,
        data: Bytes,
        filename: String,
        content_type: ContentType,
    ) -> Result<ScriptId, SubmissionError> {
        if data.is_empty() {
            return Err(SubmissionError::EmptyUpload);
        }

        let document = ScriptDocument::new(filename, content_type, data.len() as u64);
        let script_id = document.id;
        let storage_path = StoragePath::upload(&script_id, &document.filename);

        self.blob_store.put(&storage_path, data).await?;
        self.repository
            .create_job(&ProcessingJob::new(
                script_id,
                document.filename.clone(),
                content_type,
            ))
            .await?;

        self.enqueue(ScriptJobMessage {
            document,
            storage_path,
        })
        .await?;

        tracing::info!(script_id = %script_id, "Script processing job enqueued");
        Ok(script_id)
    }

    /// Restarts a finished or failed script from the beginning using its
    /// stored upload.
    #[tracing::instrument(skip(self))]
    pub async fn resubmit(&self, script_id: ScriptId) -> Result<(), SubmissionError> {
        let job = self
            .repository
            .get_job(script_id)
            .await?
            .ok_or(SubmissionError::NotFound(script_id))?;

        if job.status.is_running() {
            return Err(SubmissionError::AlreadyRunning(script_id));
        }

        match self
            .repository
            .update_status(script_id, ProcessingStatus::Initializing, 0, "queued", None)
            .await
        {
            Ok(()) => {}
            Err(RepositoryError::ConstraintViolation(_)) => {
                return Err(SubmissionError::AlreadyRunning(script_id));
            }
            Err(e) => return Err(e.into()),
        }

        let storage_path = StoragePath::upload(&script_id, &job.filename);
        let document = ScriptDocument {
            id: script_id,
            filename: job.filename,
            content_type: job.content_type,
            size_bytes: 0,
        };

        self.enqueue(ScriptJobMessage {
            document,
            storage_path,
        })
        .await
    }

    async fn enqueue(&self, msg: ScriptJobMessage) -> Result<(), SubmissionError> {
        let script_id = msg.document.id;
        if let Err(e) = self.sender.send(msg).await {
            tracing::error!(error = %e, "Failed to enqueue script processing job");
            let reason = "processing queue unavailable";
            self.repository
                .update_status(script_id, ProcessingStatus::Error, 0, "failed", Some(reason))
                .await?;
            return Err(SubmissionError::QueueUnavailable);
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("uploaded file is empty")]
    EmptyUpload,
    #[error("script not found: {0}")]
    NotFound(ScriptId),
    #[error("script {0} is already being processed")]
    AlreadyRunning(ScriptId),
    #[error("processing queue unavailable")]
    QueueUnavailable,
    #[error("storage: {0}")]
    Storage(#[from] BlobStoreError),
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}
