use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::application::ports::{RepositoryError, ScriptRepository};
use crate::domain::{ProcessingJob, ProcessingStatus, ScriptAnalysis, ScriptId, VoiceAssignments};

#[derive(Default)]
struct StoredScript {
    job: Option<ProcessingJob>,
    analysis: Option<ScriptAnalysis>,
    voices: Option<VoiceAssignments>,
}

/// Process-local repository used when no database is configured.
#[derive(Default)]
pub struct InMemoryScriptRepository {
    scripts: RwLock<HashMap<ScriptId, StoredScript>>,
}

impl InMemoryScriptRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScriptRepository for InMemoryScriptRepository {
    async fn create_job(&self, job: &ProcessingJob) -> Result<(), RepositoryError> {
        let mut scripts = self.scripts.write().await;
        let entry = scripts.entry(job.script_id).or_default();
        if entry.job.is_some() {
            return Err(RepositoryError::ConstraintViolation(format!(
                "script {} already exists",
                job.script_id
            )));
        }
        entry.job = Some(job.clone());
        Ok(())
    }

    async fn get_job(&self, id: ScriptId) -> Result<Option<ProcessingJob>, RepositoryError> {
        let scripts = self.scripts.read().await;
        Ok(scripts.get(&id).and_then(|s| s.job.clone()))
    }

    async fn start_processing(&self, id: ScriptId, phase: &str) -> Result<(), RepositoryError> {
        let mut scripts = self.scripts.write().await;
        let job = scripts
            .get_mut(&id)
            .and_then(|s| s.job.as_mut())
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;

        if job.status != ProcessingStatus::Initializing {
            return Err(RepositoryError::ConstraintViolation(format!(
                "script {} is {}, not awaiting processing",
                id, job.status
            )));
        }

        job.status = ProcessingStatus::Processing;
        job.progress = 0;
        job.phase = phase.to_string();
        job.error_message = None;
        job.updated_at = Utc::now();
        Ok(())
    }

    async fn update_status(
        &self,
        id: ScriptId,
        status: ProcessingStatus,
        progress: u8,
        phase: &str,
        error_message: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let mut scripts = self.scripts.write().await;
        let job = scripts
            .get_mut(&id)
            .and_then(|s| s.job.as_mut())
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;

        if !job.status.can_transition_to(status) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "cannot move script {} from {} to {}",
                id, job.status, status
            )));
        }

        job.status = status;
        job.progress = progress.min(100);
        job.phase = phase.to_string();
        job.error_message = error_message.map(str::to_string);
        job.updated_at = Utc::now();
        Ok(())
    }

    async fn save_analysis(
        &self,
        id: ScriptId,
        analysis: &ScriptAnalysis,
    ) -> Result<(), RepositoryError> {
        let mut scripts = self.scripts.write().await;
        scripts.entry(id).or_default().analysis = Some(analysis.clone());
        Ok(())
    }

    async fn get_analysis(&self, id: ScriptId) -> Result<Option<ScriptAnalysis>, RepositoryError> {
        let scripts = self.scripts.read().await;
        Ok(scripts.get(&id).and_then(|s| s.analysis.clone()))
    }

    async fn save_voice_assignments(
        &self,
        id: ScriptId,
        assignments: &VoiceAssignments,
    ) -> Result<(), RepositoryError> {
        let mut scripts = self.scripts.write().await;
        scripts.entry(id).or_default().voices = Some(assignments.clone());
        Ok(())
    }

    async fn get_voice_assignments(
        &self,
        id: ScriptId,
    ) -> Result<Option<VoiceAssignments>, RepositoryError> {
        let scripts = self.scripts.read().await;
        Ok(scripts.get(&id).and_then(|s| s.voices.clone()))
    }
}
