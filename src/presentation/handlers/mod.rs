mod auditions;
mod error;
mod health;
mod script_analysis;
mod script_status;
mod submit_script;

pub use auditions::{auditions_handler, voicing_handler};
pub use error::{ApiError, ErrorResponse};
pub use health::health_handler;
pub use script_analysis::{script_analysis_handler, voice_assignments_handler};
pub use script_status::{ScriptStatusResponse, script_status_handler};
pub use submit_script::{reprocess_script_handler, submit_script_handler};
