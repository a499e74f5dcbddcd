use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{ProcessingJob, ProcessingStatus, ScriptAnalysis, ScriptId, VoiceAssignments};

/// Persistence collaborator. The aggregate, the status record and the voice
/// map are stored and read independently.
#[async_trait]
pub trait ScriptRepository: Send + Sync {
    async fn create_job(&self, job: &ProcessingJob) -> Result<(), RepositoryError>;

    async fn get_job(&self, id: ScriptId) -> Result<Option<ProcessingJob>, RepositoryError>;

    /// Atomically moves an `initializing` job to `processing`; any other
    /// current status is a `ConstraintViolation`. This is what keeps two runs
    /// of the same script from overlapping.
    async fn start_processing(&self, id: ScriptId, phase: &str) -> Result<(), RepositoryError>;

    /// Must reject transitions not allowed by
    /// [`ProcessingStatus::can_transition_to`] with `ConstraintViolation`.
    async fn update_status(
        &self,
        id: ScriptId,
        status: ProcessingStatus,
        progress: u8,
        phase: &str,
        error_message: Option<&str>,
    ) -> Result<(), RepositoryError>;

    async fn save_analysis(
        &self,
        id: ScriptId,
        analysis: &ScriptAnalysis,
    ) -> Result<(), RepositoryError>;

    async fn get_analysis(&self, id: ScriptId) -> Result<Option<ScriptAnalysis>, RepositoryError>;

    async fn save_voice_assignments(
        &self,
        id: ScriptId,
        assignments: &VoiceAssignments,
    ) -> Result<(), RepositoryError>;

    async fn get_voice_assignments(
        &self,
        id: ScriptId,
    ) -> Result<Option<VoiceAssignments>, RepositoryError>;
}
