use scriptcast::application::services::{estimated_duration, finalize};
use scriptcast::domain::{
    ACTION_CHARACTER_ID, ActionLine, Character, DialogueLine, ScriptAnalysis,
};

fn document() -> ScriptAnalysis {
    let mut alice = Character::new("ALICE", 1);
    alice.push_dialogue(DialogueLine::new("Hello there.", 2));
    alice.push_dialogue(DialogueLine::new("Goodbye.", 9));
    let mut bob = Character::new("BOB", 4);
    bob.push_dialogue(DialogueLine::new("Hi Alice.", 5));

    let mut document = ScriptAnalysis::new();
    document.characters = vec![alice, bob];
    document.action_lines = vec![ActionLine::new("The kettle boils.", 7)];
    document
}

#[test]
fn given_dialogue_and_actions_when_finalizing_then_lines_interleave_by_position() {
    let finalized = finalize(document(), 60);

    let order: Vec<(usize, &str)> = finalized
        .processed_lines
        .iter()
        .map(|l| (l.original_line_number, l.character_id.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![(2, "alice"), (5, "bob"), (7, ACTION_CHARACTER_ID), (9, "alice")]
    );
    assert!(finalized.processed_lines[2].is_action());
    assert_eq!(finalized.processed_lines[2].character_name, "Action");
}

#[test]
fn given_finalized_document_when_reading_sequence_numbers_then_they_are_contiguous_from_one() {
    let finalized = finalize(document(), 60);

    let numbers: Vec<usize> = finalized
        .processed_lines
        .iter()
        .map(|l| l.sequential_number)
        .collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
    assert_eq!(finalized.action_lines[0].sequential_number, Some(3));
    let alice = finalized.character("ALICE").unwrap();
    assert_eq!(alice.dialogue[0].sequential_number, Some(1));
    assert_eq!(alice.dialogue[1].sequential_number, Some(4));
    assert_eq!(finalized.metadata.total_lines, 4);
}

#[test]
fn given_dialogue_on_action_line_number_when_finalizing_then_dialogue_copy_is_removed() {
    let mut doc = document();
    doc.characters[1].push_dialogue(DialogueLine::new("The kettle boils.", 7));

    let finalized = finalize(doc, 60);

    let bob = finalized.character("BOB").unwrap();
    assert_eq!(bob.lines, 1);
    assert_eq!(
        finalized
            .processed_lines
            .iter()
            .filter(|l| l.original_line_number == 7)
            .count(),
        1
    );
    assert_eq!(finalized.metadata.total_lines, 4);
}

#[test]
fn given_dialogue_on_every_action_position_when_finalizing_then_only_actions_remain() {
    let mut doc = ScriptAnalysis::new();
    let mut carol = Character::new("CAROL", 0);
    carol.push_dialogue(DialogueLine::new("Later.", 3));
    doc.characters = vec![carol];
    doc.action_lines = vec![ActionLine::new("She turns.", 1), ActionLine::new("Dusk.", 3)];

    let finalized = finalize(doc, 60);

    assert_eq!(finalized.processed_lines.len(), 2);
    assert!(finalized.character("CAROL").unwrap().dialogue.is_empty());
}

#[test]
fn given_finalized_output_when_finalizing_again_then_output_is_identical() {
    let once = finalize(document(), 60);
    let twice = finalize(once.clone(), 60);

    assert_eq!(once, twice);
    assert_eq!(
        serde_json::to_string(&once).unwrap(),
        serde_json::to_string(&twice).unwrap()
    );
}

#[test]
fn given_line_totals_when_estimating_duration_then_minutes_round_up() {
    assert_eq!(estimated_duration(0, 60), 0);
    assert_eq!(estimated_duration(1, 60), 1);
    assert_eq!(estimated_duration(60, 60), 1);
    assert_eq!(estimated_duration(61, 60), 2);
    assert_eq!(estimated_duration(90, 30), 3);
}

#[test]
fn given_zero_rate_when_estimating_duration_then_rate_is_treated_as_one() {
    assert_eq!(estimated_duration(5, 0), 5);
}

#[test]
fn given_custom_rate_when_finalizing_then_duration_uses_it() {
    let finalized = finalize(document(), 2);

    assert_eq!(finalized.metadata.estimated_duration, 2);
}

#[test]
fn given_finalized_document_when_serializing_then_fields_are_camel_case() {
    let finalized = finalize(document(), 60);

    let json = serde_json::to_value(&finalized).unwrap();

    assert!(json["processedLines"][0]["sequentialNumber"].is_number());
    assert!(json["processedLines"][0]["originalLineNumber"].is_number());
    assert_eq!(json["processedLines"][2]["isAction"], true);
    assert_eq!(json["metadata"]["totalLines"], 4);
    assert!(json["metadata"]["estimatedDuration"].is_number());
    assert_eq!(json["characters"][0]["firstAppearance"], 1);
    assert!(json.get("lastMergedStart").is_none());
}
