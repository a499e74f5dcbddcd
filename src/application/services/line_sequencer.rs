use std::collections::{HashMap, HashSet};

use crate::domain::{
    ACTION_CHARACTER_ID, ACTION_CHARACTER_NAME, ProcessedLine, ScriptAnalysis,
};

pub const DEFAULT_LINES_PER_MINUTE: u32 = 60;

/// Removes dialogue duplicated by action lines, interleaves both by source
/// position and assigns contiguous 1-based sequence numbers across the
/// flattened list, the character dialogue and the action lines.
///
/// Running it on its own output changes nothing.
pub fn finalize(mut document: ScriptAnalysis, lines_per_minute: u32) -> ScriptAnalysis {
    let action_numbers: HashSet<usize> = document
        .action_lines
        .iter()
        .map(|a| a.line_number)
        .collect();

    for character in &mut document.characters {
        character
            .dialogue
            .retain(|d| !action_numbers.contains(&d.line_number));
        character.lines = character.dialogue.len();
    }

    let mut combined: Vec<ProcessedLine> = Vec::new();
    for action in &document.action_lines {
        combined.push(ProcessedLine {
            character_id: ACTION_CHARACTER_ID.to_string(),
            character_name: ACTION_CHARACTER_NAME.to_string(),
            text: action.text.clone(),
            original_line_number: action.line_number,
            sequential_number: 0,
            is_action: Some(true),
            is_user: None,
            voices: None,
        });
    }
    for character in &document.characters {
        let character_id = character.key();
        for line in &character.dialogue {
            combined.push(ProcessedLine {
                character_id: character_id.clone(),
                character_name: character.name.clone(),
                text: line.text.clone(),
                original_line_number: line.line_number,
                sequential_number: 0,
                is_action: None,
                is_user: None,
                voices: line.voices.clone(),
            });
        }
    }

    combined.sort_by_key(|line| line.original_line_number);

    let mut action_sequence: HashMap<usize, usize> = HashMap::new();
    let mut dialogue_sequence: HashMap<(String, usize), usize> = HashMap::new();
    for (index, line) in combined.iter_mut().enumerate() {
        line.sequential_number = index + 1;
        if line.is_action() {
            action_sequence.insert(line.original_line_number, line.sequential_number);
        } else {
            dialogue_sequence.insert(
                (line.character_id.clone(), line.original_line_number),
                line.sequential_number,
            );
        }
    }

    for action in &mut document.action_lines {
        action.sequential_number = action_sequence.get(&action.line_number).copied();
    }
    for character in &mut document.characters {
        let character_id = character.key();
        for line in &mut character.dialogue {
            line.sequential_number = dialogue_sequence
                .get(&(character_id.clone(), line.line_number))
                .copied();
        }
    }

    document.metadata.total_lines = combined.len();
    document.metadata.estimated_duration =
        estimated_duration(combined.len(), lines_per_minute);
    document.processed_lines = combined;
    document
}

/// Whole minutes needed to read `total_lines` at `lines_per_minute`.
pub fn estimated_duration(total_lines: usize, lines_per_minute: u32) -> u32 {
    let per_minute = lines_per_minute.max(1) as usize;
    total_lines.div_ceil(per_minute) as u32
}
