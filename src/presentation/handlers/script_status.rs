use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use serde::Serialize;

use super::error::{ApiError, parse_script_id};
use crate::domain::ProcessingJob;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct ScriptStatusResponse {
    pub script_id: String,
    pub filename: String,
    pub status: String,
    pub progress: u8,
    pub phase: String,
    pub error_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ProcessingJob> for ScriptStatusResponse {
    fn from(job: ProcessingJob) -> Self {
        Self {
            script_id: job.script_id.to_string(),
            filename: job.filename,
            status: job.status.as_str().to_string(),
            progress: job.progress,
            phase: job.phase,
            error_message: job.error_message,
            created_at: job.created_at.to_rfc3339(),
            updated_at: job.updated_at.to_rfc3339(),
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn script_status_handler(
    State(state): State<AppState>,
    Path(script_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let script_id = parse_script_id(&script_id)?;
    let job = state
        .repository
        .get_job(script_id)
        .await?
        .ok_or_else(|| ApiError::script_not_found(script_id))?;

    Ok(Json(ScriptStatusResponse::from(job)))
}
