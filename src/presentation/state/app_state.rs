use std::path::PathBuf;
use std::sync::Arc;

use crate::application::ports::ScriptRepository;
use crate::application::services::{AuditionService, ScriptSubmissionService};

#[derive(Clone)]
pub struct AppState {
    pub submission_service: Arc<ScriptSubmissionService>,
    pub audition_service: Arc<AuditionService>,
    pub repository: Arc<dyn ScriptRepository>,
    pub max_upload_bytes: usize,
    /// Directory served under `/media` when audio is stored locally.
    pub media_root: Option<PathBuf>,
}
