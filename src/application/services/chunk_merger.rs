use std::collections::HashSet;

use super::line_classifier::ChunkResult;
use crate::domain::{ActionLine, Character, DialogueLine, ScriptAnalysis};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    #[error("character {character} has two dialogue entries at line {line_number}")]
    NonSequentialDialogue {
        character: String,
        line_number: usize,
    },
    #[error("action line {line_number} was already merged from an earlier chunk")]
    DuplicateActionLine { line_number: usize },
    #[error("action line {line_number} appears more than once in the chunk")]
    NonSequentialActionLine { line_number: usize },
    #[error("chunk starting at line {start_line} arrived after chunk starting at {previous}")]
    OutOfOrderChunk { start_line: usize, previous: usize },
}

/// Folds one chunk's result into the document accumulator.
///
/// Chunks must arrive in ascending `start_line` order. On error the input
/// document is dropped; callers keep a clone when they need to continue.
pub fn merge_chunk(
    mut document: ScriptAnalysis,
    chunk: ChunkResult,
) -> Result<ScriptAnalysis, MergeError> {
    if let Some(previous) = document.last_merged_start {
        if chunk.start_line < previous {
            return Err(MergeError::OutOfOrderChunk {
                start_line: chunk.start_line,
                previous,
            });
        }
    }

    merge_action_lines(&mut document.action_lines, chunk.action_lines)?;

    for incoming in chunk.characters {
        match document.character_mut(&incoming.name) {
            Some(existing) => merge_character(existing, incoming)?,
            None => document.characters.push(incoming),
        }
    }

    document.scenes.extend(chunk.scenes);
    document.scenes.sort_by_key(|s| s.start_line);

    document.metadata.total_lines = document.dialogue_line_count() + document.action_lines.len();
    document.last_merged_start = Some(chunk.start_line);
    Ok(document)
}

fn merge_action_lines(
    merged: &mut Vec<ActionLine>,
    mut incoming: Vec<ActionLine>,
) -> Result<(), MergeError> {
    incoming.sort_by_key(|a| a.line_number);
    if let Some(pair) = incoming
        .windows(2)
        .find(|pair| pair[0].line_number == pair[1].line_number)
    {
        return Err(MergeError::NonSequentialActionLine {
            line_number: pair[1].line_number,
        });
    }

    let existing: HashSet<usize> = merged.iter().map(|a| a.line_number).collect();
    if let Some(duplicate) = incoming.iter().find(|a| existing.contains(&a.line_number)) {
        return Err(MergeError::DuplicateActionLine {
            line_number: duplicate.line_number,
        });
    }

    merged.extend(incoming);
    merged.sort_by_key(|a| a.line_number);
    Ok(())
}

fn merge_character(existing: &mut Character, incoming: Character) -> Result<(), MergeError> {
    let mut dialogue = std::mem::take(&mut existing.dialogue);
    dialogue.extend(incoming.dialogue);
    dialogue.sort_by_key(|d| d.line_number);

    let mut collapsed: Vec<DialogueLine> = Vec::with_capacity(dialogue.len());
    for line in dialogue {
        match collapsed.last_mut() {
            Some(last) if last.line_number == line.line_number => {
                if !last.is_multi_line && !line.is_multi_line {
                    return Err(MergeError::NonSequentialDialogue {
                        character: existing.name.clone(),
                        line_number: line.line_number,
                    });
                }
                if line.is_multi_line && !last.is_multi_line {
                    *last = line;
                }
            }
            _ => collapsed.push(line),
        }
    }

    existing.dialogue = collapsed;
    existing.first_appearance = existing.first_appearance.min(incoming.first_appearance);
    existing.lines = existing.dialogue.len();
    Ok(())
}
