use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

use super::error::{ApiError, parse_script_id};
use crate::presentation::state::AppState;

#[tracing::instrument(skip(state))]
pub async fn script_analysis_handler(
    State(state): State<AppState>,
    Path(script_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let script_id = parse_script_id(&script_id)?;
    let analysis = state
        .repository
        .get_analysis(script_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No analysis for script {}", script_id)))?;

    Ok(Json(analysis))
}

#[tracing::instrument(skip(state))]
pub async fn voice_assignments_handler(
    State(state): State<AppState>,
    Path(script_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let script_id = parse_script_id(&script_id)?;
    let assignments = state
        .repository
        .get_voice_assignments(script_id)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!("No voice assignments for script {}", script_id))
        })?;

    Ok(Json(assignments))
}
