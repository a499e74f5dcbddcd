use scriptcast::domain::{
    AnalysisMetadata, Character, ContentType, DialogueLine, ProcessingStatus, ScriptAnalysis,
    ScriptId, StoragePath, VoiceCategory,
};

#[test]
fn given_running_status_when_checking_transitions_then_only_forward_moves_allowed() {
    assert!(ProcessingStatus::Initializing.can_transition_to(ProcessingStatus::Processing));
    assert!(ProcessingStatus::Processing.can_transition_to(ProcessingStatus::Processing));
    assert!(ProcessingStatus::Validating.can_transition_to(ProcessingStatus::Completed));
    assert!(!ProcessingStatus::Validating.can_transition_to(ProcessingStatus::Processing));
    assert!(!ProcessingStatus::Initializing.can_transition_to(ProcessingStatus::Completed));
}

#[test]
fn given_terminal_status_when_checking_transitions_then_only_reset_allowed() {
    for terminal in [ProcessingStatus::Completed, ProcessingStatus::Error] {
        assert!(terminal.can_transition_to(ProcessingStatus::Initializing));
        assert!(!terminal.can_transition_to(ProcessingStatus::Processing));
        assert!(!terminal.is_running());
    }
}

#[test]
fn given_status_text_when_parsing_then_round_trips_through_display() {
    let status: ProcessingStatus = "validating".parse().unwrap();

    assert_eq!(status, ProcessingStatus::Validating);
    assert_eq!(status.to_string(), "validating");
    assert!("done".parse::<ProcessingStatus>().is_err());
}

#[test]
fn given_mime_or_filename_when_detecting_content_type_then_supported_types_resolve() {
    assert_eq!(ContentType::from_mime("application/pdf"), Some(ContentType::Pdf));
    assert_eq!(ContentType::from_mime("image/png"), None);
    assert_eq!(ContentType::from_filename("Draft.FOUNTAIN"), Some(ContentType::Text));
    assert_eq!(ContentType::from_filename("script.pdf"), Some(ContentType::Pdf));
    assert_eq!(ContentType::from_filename("noextension"), None);
}

#[test]
fn given_unsafe_filename_when_building_upload_path_then_segments_are_sanitized() {
    let id = ScriptId::new();

    let path = StoragePath::upload(&id, "../my script.pdf");

    assert_eq!(path.as_str(), format!("{}/upload/.._my_script.pdf", id));
}

#[test]
fn given_character_when_building_audio_path_then_name_is_lowercased() {
    let id = ScriptId::new();

    let path = StoragePath::audio(&id, "Mary Jane", "voice-1", "line-3");

    assert_eq!(path.as_str(), format!("{}/audio/mary_jane/voice-1/line-3.mp3", id));
}

#[test]
fn given_category_aliases_when_parsing_then_case_is_ignored() {
    assert_eq!(" Female ".parse::<VoiceCategory>(), Ok(VoiceCategory::Female));
    assert_eq!("M".parse::<VoiceCategory>(), Ok(VoiceCategory::Male));
    assert!("unknown".parse::<VoiceCategory>().is_err());
}

#[test]
fn given_mixed_case_lookup_when_finding_character_then_identity_is_case_insensitive() {
    let mut analysis = ScriptAnalysis::new();
    let mut alice = Character::new("Alice", 0);
    alice.push_dialogue(DialogueLine::new("Hi.", 1));
    analysis.characters.push(alice);

    assert_eq!(analysis.character("ALICE").map(|c| c.lines), Some(1));
    assert_eq!(analysis.dialogue_line_count(), 1);
}

#[test]
fn given_analysis_when_serializing_then_fields_are_camel_case() {
    let analysis = ScriptAnalysis {
        metadata: AnalysisMetadata {
            total_lines: 3,
            estimated_duration: 1,
            skipped_chunks: Vec::new(),
        },
        last_merged_start: Some(4),
        ..ScriptAnalysis::default()
    };

    let json = serde_json::to_value(&analysis).unwrap();

    assert_eq!(json["metadata"]["totalLines"], 3);
    assert_eq!(json["metadata"]["estimatedDuration"], 1);
    assert!(json["metadata"].get("skippedChunks").is_none());
    assert!(json.get("actionLines").is_some());
    assert!(json.get("lastMergedStart").is_none());
}
