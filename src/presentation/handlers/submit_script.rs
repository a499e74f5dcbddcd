use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use bytes::Bytes;
use serde::Serialize;

use super::error::{ApiError, parse_script_id};
use crate::domain::ContentType;
use crate::presentation::state::AppState;

const FILE_FIELD: &str = "file";

#[derive(Serialize)]
pub struct SubmitScriptResponse {
    pub script_id: String,
    pub status: &'static str,
    pub message: String,
}

struct Upload {
    filename: String,
    content_type: ContentType,
    data: Bytes,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn submit_script_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let upload = read_upload(multipart).await?;
    tracing::debug!(
        filename = %upload.filename,
        content_type = upload.content_type.as_mime(),
        bytes = upload.data.len(),
        "Script upload received"
    );

    let script_id = state
        .submission_service
        .submit(upload.data, upload.filename, upload.content_type)
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(SubmitScriptResponse {
            script_id: script_id.to_string(),
            status: "initializing",
            message: "Script processing started".to_string(),
        }),
    ))
}

#[tracing::instrument(skip(state))]
pub async fn reprocess_script_handler(
    State(state): State<AppState>,
    Path(script_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let script_id = parse_script_id(&script_id)?;
    state.submission_service.resubmit(script_id).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(SubmitScriptResponse {
            script_id: script_id.to_string(),
            status: "initializing",
            message: "Script reprocessing started".to_string(),
        }),
    ))
}

/// Takes the `file` field, or the first field carrying a filename.
async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed to read multipart: {}", e)))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            if field.name() == Some(FILE_FIELD) {
                return Err(ApiError::bad_request("File field has no filename"));
            }
            continue;
        };

        let mime = field.content_type().unwrap_or("application/octet-stream");
        let content_type = ContentType::from_mime(mime)
            .or_else(|| ContentType::from_filename(&filename))
            .ok_or_else(|| {
                ApiError::new(
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    format!("Unsupported content type: {}", mime),
                )
            })?;

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read file: {}", e)))?;

        return Ok(Upload {
            filename,
            content_type,
            data,
        });
    }

    Err(ApiError::bad_request("No file uploaded"))
}
