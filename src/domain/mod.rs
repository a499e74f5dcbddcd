mod action_line;
mod character;
mod chunk;
mod document;
mod processed_line;
mod processing_job;
mod processing_status;
mod scene;
mod script_analysis;
mod script_id;
mod storage_path;
mod voice;

pub use action_line::ActionLine;
pub use character::{Character, DialogueLine, VoiceUrls, character_key};
pub use chunk::{Chunk, RawLine};
pub use document::{ContentType, ScriptDocument};
pub use processed_line::{ACTION_CHARACTER_ID, ACTION_CHARACTER_NAME, ProcessedLine};
pub use processing_job::ProcessingJob;
pub use processing_status::ProcessingStatus;
pub use scene::Scene;
pub use script_analysis::{AnalysisMetadata, ScriptAnalysis, SkippedChunk};
pub use script_id::ScriptId;
pub use storage_path::StoragePath;
pub use voice::{VoiceAssignment, VoiceAssignments, VoiceCategory};
