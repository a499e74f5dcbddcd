use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::ProcessingStatus;

/// Sink for job checkpoints written after each major step.
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    async fn checkpoint(
        &self,
        status: ProcessingStatus,
        progress: u8,
        phase: &str,
    ) -> Result<(), RepositoryError>;
}
