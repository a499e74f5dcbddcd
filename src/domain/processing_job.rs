use chrono::{DateTime, Utc};

use super::{ContentType, ProcessingStatus, ScriptId};

/// Status record of one script's processing run, readable by polling clients.
#[derive(Debug, Clone)]
pub struct ProcessingJob {
    pub script_id: ScriptId,
    pub filename: String,
    pub content_type: ContentType,
    pub status: ProcessingStatus,
    /// Percentage, 0 to 100.
    pub progress: u8,
    pub phase: String,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProcessingJob {
    pub fn new(script_id: ScriptId, filename: String, content_type: ContentType) -> Self {
        let now = Utc::now();
        Self {
            script_id,
            filename,
            content_type,
            status: ProcessingStatus::Initializing,
            progress: 0,
            phase: "queued".to_string(),
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }
}
