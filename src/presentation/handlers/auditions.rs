use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use serde::Serialize;

use super::error::{ApiError, parse_script_id};
use crate::domain::ScriptId;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct AuditionResponse {
    pub script_id: String,
    pub auditions: BTreeMap<String, String>,
}

#[derive(Serialize)]
pub struct VoicingResponse {
    pub script_id: String,
    pub clips: usize,
}

#[tracing::instrument(skip(state))]
pub async fn auditions_handler(
    State(state): State<AppState>,
    Path(script_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let script_id = parse_script_id(&script_id)?;
    let assignments = state
        .repository
        .get_voice_assignments(script_id)
        .await?
        .ok_or_else(|| no_assignments(script_id))?;

    let auditions = state
        .audition_service
        .audition(script_id, &assignments)
        .await?;

    Ok(Json(AuditionResponse {
        script_id: script_id.to_string(),
        auditions,
    }))
}

/// Voices every dialogue line and stores the urls back into the analysis.
#[tracing::instrument(skip(state))]
pub async fn voicing_handler(
    State(state): State<AppState>,
    Path(script_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let script_id = parse_script_id(&script_id)?;
    let assignments = state
        .repository
        .get_voice_assignments(script_id)
        .await?
        .ok_or_else(|| no_assignments(script_id))?;
    let mut analysis = state
        .repository
        .get_analysis(script_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No analysis for script {}", script_id)))?;

    let clips = state
        .audition_service
        .voice_dialogue(script_id, &mut analysis, &assignments)
        .await?;
    state.repository.save_analysis(script_id, &analysis).await?;

    Ok(Json(VoicingResponse {
        script_id: script_id.to_string(),
        clips,
    }))
}

fn no_assignments(script_id: ScriptId) -> ApiError {
    ApiError::not_found(format!("No voice assignments for script {}", script_id))
}
