use scriptcast::application::services::{
    LineKind, OpenScene, ParseEvent, ParserState, classify_chunk, classify_line,
    is_character_cue, is_scene_heading,
};
use scriptcast::domain::{ActionLine, Chunk, RawLine};

fn raw(number: usize, content: &str) -> RawLine<'_> {
    RawLine {
        absolute_line_number: number,
        content,
    }
}

#[test]
fn given_kitchen_scene_when_classifying_chunk_then_scene_and_characters_are_extracted() {
    let chunk = Chunk::new(
        "INT. KITCHEN - DAY\nALICE\nHello there.\n\nBOB\nHi Alice.".to_string(),
        0,
        false,
    );

    let (result, _) = classify_chunk(&chunk, Vec::new(), ParserState::new());

    assert_eq!(result.scenes.len(), 1);
    let scene = &result.scenes[0];
    assert_eq!(scene.name, "KITCHEN");
    assert_eq!(scene.location.as_deref(), Some("INT. KITCHEN "));
    assert_eq!(scene.time_of_day.as_deref(), Some("DAY"));
    assert_eq!(scene.start_line, 0);
    assert_eq!(scene.end_line, 5);

    assert_eq!(result.characters.len(), 2);
    let alice = &result.characters[0];
    assert_eq!(alice.name, "ALICE");
    assert_eq!(alice.lines, 1);
    assert_eq!(alice.dialogue[0].text, "Hello there.");
    assert_eq!(alice.dialogue[0].line_number, 2);
    let bob = &result.characters[1];
    assert_eq!(bob.name, "BOB");
    assert_eq!(bob.dialogue[0].text, "Hi Alice.");
    assert_eq!(bob.dialogue[0].line_number, 5);
    assert!(result.action_lines.is_empty());
}

#[test]
fn given_scene_heading_forms_when_checking_then_prefix_and_time_are_required() {
    assert!(is_scene_heading("INT. KITCHEN - DAY"));
    assert!(is_scene_heading("EXT. ROOFTOP - NIGHT"));
    assert!(is_scene_heading("EXT. BEACH - early morning"));
    assert!(!is_scene_heading("INT. KITCHEN"));
    assert!(!is_scene_heading("KITCHEN - DAY"));
    assert!(is_scene_heading("INT. DAYCARE CENTER"));
}

#[test]
fn given_time_token_inside_longer_word_when_checking_then_heading_is_detected() {
    assert!(is_scene_heading("INT. HOUSE - MIDNIGHT"));
    assert!(is_scene_heading("EXT. STREET - DAYBREAK"));
    assert!(is_scene_heading("INT. OFFICE - DAYTIME"));
}

#[test]
fn given_midnight_heading_when_classifying_chunk_then_scene_opens_and_no_character_is_created() {
    let chunk = Chunk::new("INT. HOUSE - MIDNIGHT\nALICE\nHello.".to_string(), 0, false);

    let (result, _) = classify_chunk(&chunk, Vec::new(), ParserState::new());

    assert_eq!(result.scenes.len(), 1);
    assert_eq!(result.scenes[0].name, "HOUSE");
    assert_eq!(result.scenes[0].time_of_day.as_deref(), Some("NIGHT"));
    let names: Vec<&str> = result.characters.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["ALICE"]);
}

#[test]
fn given_cue_candidates_when_checking_then_uppercase_non_parentheticals_qualify() {
    assert!(is_character_cue("ALICE"));
    assert!(is_character_cue("DR. SMITH"));
    assert!(is_character_cue("FADE OUT."));
    assert!(!is_character_cue("A"));
    assert!(!is_character_cue("Alice"));
    assert!(!is_character_cue("(whispering)"));
    assert!(!is_character_cue("(BEAT)"));
    assert!(!is_character_cue("42."));
    assert!(!is_character_cue(""));
}

#[test]
fn given_action_flag_when_classifying_line_then_action_takes_priority() {
    assert_eq!(classify_line("ALICE", true), LineKind::Action);
    assert_eq!(classify_line("INT. KITCHEN - DAY", false), LineKind::SceneHeading);
    assert_eq!(classify_line("ALICE", false), LineKind::CharacterCue);
    assert_eq!(classify_line("", false), LineKind::Blank);
    assert_eq!(classify_line("She waits.", false), LineKind::Text);
}

#[test]
fn given_heading_without_separator_when_opening_scene_then_only_name_is_extracted() {
    let scene = OpenScene::from_heading("INT. BARN NIGHT", 7);

    assert_eq!(scene.name, "BARN NIGHT");
    assert_eq!(scene.location, None);
    assert_eq!(scene.time_of_day, None);
    assert_eq!(scene.start_line, 7);
}

#[test]
fn given_open_scene_when_next_heading_arrives_then_previous_scene_closes_one_line_earlier() {
    let state = ParserState::new();
    let (state, _) = state.step(raw(0, "INT. KITCHEN - DAY"), false);
    let (state, events) = state.step(raw(4, "EXT. YARD - NIGHT"), false);

    assert_eq!(events.len(), 1);
    let ParseEvent::SceneClosed(scene) = &events[0] else {
        panic!("expected scene close, got {:?}", events[0]);
    };
    assert_eq!(scene.name, "KITCHEN");
    assert_eq!(scene.end_line, 3);
    assert_eq!(state.scene.as_ref().unwrap().name, "YARD");
}

#[test]
fn given_consecutive_dialogue_lines_when_blank_arrives_then_one_multi_line_entry_is_emitted() {
    let state = ParserState::new();
    let (state, events) = state.step(raw(0, "ALICE"), false);
    assert!(matches!(&events[0], ParseEvent::CueDetected { name, line_number: 0 } if name == "ALICE"));

    let (state, _) = state.step(raw(1, "I was going"), false);
    let (state, _) = state.step(raw(2, "to say something."), false);
    let (state, events) = state.step(raw(3, ""), false);

    let ParseEvent::Dialogue { speaker, line } = &events[0] else {
        panic!("expected dialogue, got {:?}", events);
    };
    assert_eq!(speaker, "ALICE");
    assert_eq!(line.text, "I was going to say something.");
    assert_eq!(line.line_number, 1);
    assert!(line.is_multi_line);
    assert!(state.speaker.is_none());
}

#[test]
fn given_speaker_when_action_line_arrives_then_dialogue_flushes_and_speaker_clears() {
    let state = ParserState::new();
    let (state, _) = state.step(raw(0, "BOB"), false);
    let (state, _) = state.step(raw(1, "Wait."), false);
    let (state, events) = state.step(raw(2, "He leaves."), true);

    assert!(matches!(&events[0], ParseEvent::Dialogue { line, .. } if line.text == "Wait."));
    assert!(state.speaker.is_none());
    assert!(state.buffer.is_empty());
}

#[test]
fn given_text_without_speaker_when_stepping_then_it_is_ignored() {
    let (state, events) = ParserState::new().step(raw(0, "Rain falls."), false);

    assert!(events.is_empty());
    assert_eq!(state, ParserState::new());
}

#[test]
fn given_cue_with_blank_line_before_speech_when_stepping_then_speaker_is_kept() {
    let state = ParserState::new();
    let (state, _) = state.step(raw(0, "ALICE"), false);
    let (state, events) = state.step(raw(1, ""), false);

    assert!(events.is_empty());
    assert_eq!(state.speaker.as_deref(), Some("ALICE"));
}

#[test]
fn given_chunk_ending_mid_speech_when_classifying_then_speaker_carries_into_next_chunk() {
    let first = Chunk::new("INT. HALL - DAY\nALICE\nI never".to_string(), 0, true);
    let second = Chunk::new("told you that.\n\nBOB\nNo.".to_string(), 3, false);

    let (first_result, carried) = classify_chunk(&first, Vec::new(), ParserState::new());
    let (second_result, _) = classify_chunk(&second, Vec::new(), carried);

    assert_eq!(first_result.characters[0].dialogue[0].text, "I never");
    assert_eq!(first_result.scenes[0].end_line, 2);
    let alice = second_result
        .characters
        .iter()
        .find(|c| c.name == "ALICE")
        .unwrap();
    assert_eq!(alice.dialogue[0].text, "told you that.");
    assert_eq!(alice.dialogue[0].line_number, 3);
}

#[test]
fn given_classifier_action_lines_when_classifying_chunk_then_they_pass_through_and_break_speech() {
    let chunk = Chunk::new("ALICE\nHello.\nShe sits.\nAnyway.".to_string(), 10, false);
    let actions = vec![ActionLine::new("She sits.", 12)];

    let (result, state) = classify_chunk(&chunk, actions.clone(), ParserState::new());

    assert_eq!(result.action_lines, actions);
    assert_eq!(result.start_line, 10);
    assert_eq!(result.characters.len(), 1);
    assert_eq!(result.characters[0].dialogue.len(), 1);
    assert_eq!(result.characters[0].dialogue[0].line_number, 11);
    assert!(state.speaker.is_none());
}

#[test]
fn given_repeated_cue_when_classifying_then_one_character_entry_is_kept() {
    let chunk = Chunk::new("ALICE\nOne.\n\nALICE\nTwo.".to_string(), 0, false);

    let (result, _) = classify_chunk(&chunk, Vec::new(), ParserState::new());

    assert_eq!(result.characters.len(), 1);
    assert_eq!(result.characters[0].lines, 2);
    assert_eq!(result.characters[0].first_appearance, 0);
}
