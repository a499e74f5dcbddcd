mod action_line_classifier;
mod audition_service;
mod character_casting;
mod chunk_merger;
mod line_classifier;
mod line_sequencer;
mod response_parsing;
mod retry;
mod script_pipeline;
mod script_processing_worker;
mod script_submission_service;

pub use action_line_classifier::{
    ACTION_LINE_INSTRUCTIONS, ActionLineClassifier, ClassificationError, number_lines,
    parse_action_lines,
};
pub use audition_service::{AuditionError, AuditionService};
pub use character_casting::{
    CastingError, CharacterCasting, ValidationOutcome, VoiceCatalog, assign_from_predictions,
};
pub use chunk_merger::{MergeError, merge_chunk};
pub use line_classifier::{
    ChunkResult, DialogueBuffer, LineKind, OpenScene, ParseEvent, ParserState, classify_chunk,
    classify_line, is_character_cue, is_scene_heading,
};
pub use line_sequencer::{DEFAULT_LINES_PER_MINUTE, estimated_duration, finalize};
pub use response_parsing::strip_code_fence;
pub use retry::{Backoff, RetryPolicy, Retryable, retry_with_backoff};
pub use script_pipeline::{PipelineOutput, ProcessingError, ScriptPipeline};
pub use script_processing_worker::{JobProgress, ScriptJobMessage, ScriptProcessingWorker};
pub use script_submission_service::{ScriptSubmissionService, SubmissionError};
