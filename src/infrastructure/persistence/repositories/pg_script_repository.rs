use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{RepositoryError, ScriptRepository};
use crate::domain::{
    ContentType, ProcessingJob, ProcessingStatus, ScriptAnalysis, ScriptId, VoiceAssignments,
};

type JobRow = (
    Uuid,
    String,
    String,
    String,
    i16,
    String,
    Option<String>,
    DateTime<Utc>,
    DateTime<Utc>,
);

pub struct PgScriptRepository {
    pool: PgPool,
}

impl PgScriptRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn query_failed(e: sqlx::Error) -> RepositoryError {
    RepositoryError::QueryFailed(e.to_string())
}

fn job_from_row(row: JobRow) -> Result<ProcessingJob, RepositoryError> {
    let (script_id, filename, content_type, status, progress, phase, error_message, created_at, updated_at) =
        row;
    let content_type = ContentType::from_mime(&content_type).ok_or_else(|| {
        RepositoryError::QueryFailed(format!("unknown content type: {}", content_type))
    })?;
    let status = status
        .parse::<ProcessingStatus>()
        .map_err(RepositoryError::QueryFailed)?;

    Ok(ProcessingJob {
        script_id: ScriptId::from_uuid(script_id),
        filename,
        content_type,
        status,
        progress: progress.clamp(0, 100) as u8,
        phase,
        error_message,
        created_at,
        updated_at,
    })
}

#[async_trait]
impl ScriptRepository for PgScriptRepository {
    #[instrument(skip(self, job), fields(script_id = %job.script_id))]
    async fn create_job(&self, job: &ProcessingJob) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO script_jobs
                (script_id, filename, content_type, status, progress, phase, error_message, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(job.script_id.as_uuid())
        .bind(&job.filename)
        .bind(job.content_type.as_mime())
        .bind(job.status.as_str())
        .bind(job.progress as i16)
        .bind(&job.phase)
        .bind(&job.error_message)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        Ok(())
    }

    #[instrument(skip(self), fields(script_id = %id))]
    async fn get_job(&self, id: ScriptId) -> Result<Option<ProcessingJob>, RepositoryError> {
        let row: Option<JobRow> = sqlx::query_as(
            r#"
            SELECT script_id, filename, content_type, status, progress, phase, error_message, created_at, updated_at
            FROM script_jobs
            WHERE script_id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?;

        row.map(job_from_row).transpose()
    }

    #[instrument(skip(self), fields(script_id = %id))]
    async fn start_processing(&self, id: ScriptId, phase: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE script_jobs
            SET status = $1, progress = 0, phase = $2, error_message = NULL, updated_at = $3
            WHERE script_id = $4 AND status = $5
            "#,
        )
        .bind(ProcessingStatus::Processing.as_str())
        .bind(phase)
        .bind(Utc::now())
        .bind(id.as_uuid())
        .bind(ProcessingStatus::Initializing.as_str())
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::ConstraintViolation(format!(
                "script {} is not awaiting processing",
                id
            )));
        }
        Ok(())
    }

    #[instrument(skip(self, error_message), fields(script_id = %id, status = %status))]
    async fn update_status(
        &self,
        id: ScriptId,
        status: ProcessingStatus,
        progress: u8,
        phase: &str,
        error_message: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(query_failed)?;

        let current: Option<(String,)> =
            sqlx::query_as("SELECT status FROM script_jobs WHERE script_id = $1 FOR UPDATE")
                .bind(id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(query_failed)?;
        let current = current
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?
            .0
            .parse::<ProcessingStatus>()
            .map_err(RepositoryError::QueryFailed)?;

        if !current.can_transition_to(status) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "cannot move script {} from {} to {}",
                id, current, status
            )));
        }

        sqlx::query(
            r#"
            UPDATE script_jobs
            SET status = $1, progress = $2, phase = $3, error_message = $4, updated_at = $5
            WHERE script_id = $6
            "#,
        )
        .bind(status.as_str())
        .bind(progress.min(100) as i16)
        .bind(phase)
        .bind(error_message)
        .bind(Utc::now())
        .bind(id.as_uuid())
        .execute(&mut *tx)
        .await
        .map_err(query_failed)?;

        tx.commit().await.map_err(query_failed)
    }

    #[instrument(skip(self, analysis), fields(script_id = %id))]
    async fn save_analysis(
        &self,
        id: ScriptId,
        analysis: &ScriptAnalysis,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO script_analyses (script_id, analysis, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (script_id) DO UPDATE SET analysis = EXCLUDED.analysis, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(Json(analysis))
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        Ok(())
    }

    #[instrument(skip(self), fields(script_id = %id))]
    async fn get_analysis(&self, id: ScriptId) -> Result<Option<ScriptAnalysis>, RepositoryError> {
        let row: Option<(Json<ScriptAnalysis>,)> =
            sqlx::query_as("SELECT analysis FROM script_analyses WHERE script_id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(query_failed)?;

        Ok(row.map(|(Json(analysis),)| analysis))
    }

    #[instrument(skip(self, assignments), fields(script_id = %id))]
    async fn save_voice_assignments(
        &self,
        id: ScriptId,
        assignments: &VoiceAssignments,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO voice_assignments (script_id, assignments, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (script_id) DO UPDATE SET assignments = EXCLUDED.assignments, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(Json(assignments))
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        Ok(())
    }

    #[instrument(skip(self), fields(script_id = %id))]
    async fn get_voice_assignments(
        &self,
        id: ScriptId,
    ) -> Result<Option<VoiceAssignments>, RepositoryError> {
        let row: Option<(Json<VoiceAssignments>,)> =
            sqlx::query_as("SELECT assignments FROM voice_assignments WHERE script_id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(query_failed)?;

        Ok(row.map(|(Json(assignments),)| assignments))
    }
}
