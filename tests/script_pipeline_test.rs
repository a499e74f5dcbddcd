use std::sync::Arc;

use scriptcast::application::ports::LlmClientError;
use scriptcast::application::services::ProcessingError;
use scriptcast::domain::{ProcessingStatus, VoiceCategory};

mod helpers;
use helpers::{
    KITCHEN_SCENE, RecordingProgress, RejectingValidator, ScriptedActionLlm, TablePredictor,
    pipeline,
};

const TWO_SCENES: &str =
    "INT. KITCHEN - DAY\nALICE\nHello there.\n\nEXT. GARDEN - NIGHT\nBOB\nHi Alice.\n";

fn predictor() -> Arc<TablePredictor> {
    Arc::new(TablePredictor::new(&[
        ("ALICE", VoiceCategory::Female),
        ("BOB", VoiceCategory::Male),
    ]))
}

#[tokio::test]
async fn given_kitchen_scene_when_running_pipeline_then_document_is_complete() {
    let pipeline = pipeline(
        Arc::new(ScriptedActionLlm::new(&[])),
        Arc::new(RejectingValidator::accepting_all()),
        predictor(),
        8000,
    );
    let progress = RecordingProgress::default();

    let output = pipeline.run(KITCHEN_SCENE, &progress).await.unwrap();
    let analysis = output.analysis;

    assert_eq!(analysis.scenes.len(), 1);
    assert_eq!(analysis.scenes[0].name, "KITCHEN");
    assert_eq!(analysis.scenes[0].location.as_deref(), Some("INT. KITCHEN "));
    assert_eq!(analysis.scenes[0].time_of_day.as_deref(), Some("DAY"));
    let names: Vec<&str> = analysis.characters.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["ALICE", "BOB"]);
    assert!(analysis.characters.iter().all(|c| c.lines == 1));
    assert!(analysis.action_lines.is_empty());
    let sequence: Vec<usize> = analysis
        .processed_lines
        .iter()
        .map(|l| l.sequential_number)
        .collect();
    assert_eq!(sequence, vec![1, 2]);
    assert_eq!(analysis.metadata.total_lines, 2);
    assert_eq!(analysis.metadata.estimated_duration, 1);

    assert_eq!(output.voice_assignments["ALICE"].voice_id, "f1");
    assert_eq!(output.voice_assignments["BOB"].voice_id, "m1");
    assert_eq!(output.voice_assignments["BOB"].test_text, "Hi Alice.");
}

#[tokio::test]
async fn given_action_lines_when_running_pipeline_then_they_are_sequenced_with_dialogue() {
    let text = "INT. KITCHEN - DAY\nThe kettle screams.\nALICE\nHello there.\n\nShe pours.\nBOB\nThanks.";
    let pipeline = pipeline(
        Arc::new(ScriptedActionLlm::new(&["The kettle screams.", "She pours."])),
        Arc::new(RejectingValidator::accepting_all()),
        predictor(),
        8000,
    );

    let output = pipeline
        .run(text, &RecordingProgress::default())
        .await
        .unwrap();

    let flattened: Vec<(&str, usize)> = output
        .analysis
        .processed_lines
        .iter()
        .map(|l| (l.text.as_str(), l.sequential_number))
        .collect();
    assert_eq!(
        flattened,
        vec![
            ("The kettle screams.", 1),
            ("Hello there.", 2),
            ("She pours.", 3),
            ("Thanks.", 4)
        ]
    );
    assert_eq!(output.analysis.action_lines.len(), 2);
}

#[tokio::test]
async fn given_failing_chunk_when_running_pipeline_then_chunk_is_recorded_and_rest_survives() {
    let llm = ScriptedActionLlm::new(&[]).failing_at(4, LlmClientError::RateLimited);
    let pipeline = pipeline(
        Arc::new(llm),
        Arc::new(RejectingValidator::accepting_all()),
        predictor(),
        40,
    );

    let output = pipeline
        .run(TWO_SCENES, &RecordingProgress::default())
        .await
        .unwrap();
    let analysis = output.analysis;

    assert_eq!(analysis.metadata.skipped_chunks.len(), 1);
    assert_eq!(analysis.metadata.skipped_chunks[0].chunk_index, 1);
    assert_eq!(analysis.metadata.skipped_chunks[0].start_line, 4);
    assert!(analysis.character("ALICE").is_some());
    assert!(analysis.character("BOB").is_none());
    assert_eq!(analysis.scenes.len(), 1);
}

#[tokio::test]
async fn given_out_of_range_response_when_running_pipeline_then_earlier_chunks_are_untouched() {
    struct OffByOne;

    #[async_trait::async_trait]
    impl scriptcast::application::ports::LlmClient for OffByOne {
        async fn complete(&self, _: &str, input: &str) -> Result<String, LlmClientError> {
            let first: usize = input.split(':').next().unwrap().parse().unwrap();
            if first == 0 {
                return Ok("[]".to_string());
            }
            let last = first + input.split('\n').count() - 1;
            Ok(format!(r#"[{{"text": "x", "lineNumber": {}}}]"#, last + 1))
        }
    }

    let pipeline = pipeline(
        Arc::new(OffByOne),
        Arc::new(RejectingValidator::accepting_all()),
        predictor(),
        40,
    );

    let output = pipeline
        .run(TWO_SCENES, &RecordingProgress::default())
        .await
        .unwrap();

    let alice = output.analysis.character("ALICE").unwrap();
    assert_eq!(alice.dialogue[0].text, "Hello there.");
    assert!(output.analysis.action_lines.is_empty());
    assert!(output.analysis.metadata.skipped_chunks[0]
        .error
        .contains("outside the chunk range"));
}

#[tokio::test]
async fn given_authentication_failure_when_running_pipeline_then_job_aborts() {
    let llm = ScriptedActionLlm::new(&[])
        .failing_at(0, LlmClientError::AuthenticationFailed("HTTP 401".into()));
    let pipeline = pipeline(
        Arc::new(llm),
        Arc::new(RejectingValidator::accepting_all()),
        predictor(),
        8000,
    );

    let error = pipeline
        .run(KITCHEN_SCENE, &RecordingProgress::default())
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        ProcessingError::Classification { chunk_index: 0, .. }
    ));
}

#[tokio::test]
async fn given_only_stage_directions_when_running_pipeline_then_no_characters_detected() {
    let pipeline = pipeline(
        Arc::new(ScriptedActionLlm::new(&[])),
        Arc::new(RejectingValidator::new(&["FADE OUT."])),
        predictor(),
        8000,
    );

    let error = pipeline
        .run("Rain hammers the roof.\n\nFADE OUT.", &RecordingProgress::default())
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        ProcessingError::NoCharactersDetected { skipped_chunks: 0 }
    ));
}

#[tokio::test]
async fn given_blank_text_when_running_pipeline_then_empty_text_error() {
    let llm = Arc::new(ScriptedActionLlm::new(&[]));
    let pipeline = pipeline(
        llm.clone(),
        Arc::new(RejectingValidator::accepting_all()),
        predictor(),
        8000,
    );

    let error = pipeline
        .run("  \n \n", &RecordingProgress::default())
        .await
        .unwrap_err();

    assert!(matches!(error, ProcessingError::EmptyText));
    assert_eq!(llm.calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn given_successful_run_when_checking_progress_then_checkpoints_advance_through_phases() {
    let pipeline = pipeline(
        Arc::new(ScriptedActionLlm::new(&[])),
        Arc::new(RejectingValidator::accepting_all()),
        predictor(),
        40,
    );
    let progress = RecordingProgress::default();

    pipeline.run(TWO_SCENES, &progress).await.unwrap();

    let checkpoints = progress.checkpoints.lock().unwrap();
    let values: Vec<u8> = checkpoints.iter().map(|(_, p, _)| *p).collect();
    assert!(values.windows(2).all(|pair| pair[0] <= pair[1]), "{values:?}");
    assert_eq!(checkpoints.first().unwrap().0, ProcessingStatus::Processing);
    assert_eq!(checkpoints.last().unwrap().0, ProcessingStatus::Validating);
    assert_eq!(*values.last().unwrap(), 90);
    assert!(values.contains(&70));
}
