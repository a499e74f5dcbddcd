use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{ActionLine, Character, Chunk, DialogueLine, RawLine, Scene, character_key};

static TIME_OF_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(DAY|NIGHT|EVENING|MORNING)").unwrap());

const SCENE_PREFIXES: [&str; 2] = ["INT.", "EXT."];

/// Classification of a single trimmed line, independent of parser state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Action,
    SceneHeading,
    CharacterCue,
    Blank,
    Text,
}

/// Classifies a line in priority order: action, scene heading, cue, blank, text.
pub fn classify_line(trimmed: &str, is_action: bool) -> LineKind {
    if is_action {
        LineKind::Action
    } else if is_scene_heading(trimmed) {
        LineKind::SceneHeading
    } else if is_character_cue(trimmed) {
        LineKind::CharacterCue
    } else if trimmed.is_empty() {
        LineKind::Blank
    } else {
        LineKind::Text
    }
}

pub fn is_scene_heading(trimmed: &str) -> bool {
    SCENE_PREFIXES.iter().any(|p| trimmed.starts_with(p)) && TIME_OF_DAY.is_match(trimmed)
}

/// An all-uppercase line of at least two characters that is not a parenthetical.
/// Lines without any letter, such as page or scene numbers, are not cues.
pub fn is_character_cue(trimmed: &str) -> bool {
    trimmed.chars().count() >= 2
        && trimmed.to_uppercase() == trimmed
        && trimmed.chars().any(char::is_alphabetic)
        && !trimmed.starts_with('(')
        && !trimmed.ends_with(')')
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenScene {
    pub name: String,
    pub start_line: usize,
    pub location: Option<String>,
    pub time_of_day: Option<String>,
}

impl OpenScene {
    pub fn from_heading(heading: &str, start_line: usize) -> Self {
        let location = heading
            .split_once('-')
            .map(|(before, _)| before.to_string());
        let time_of_day = heading
            .rsplit_once('-')
            .and_then(|(_, after)| TIME_OF_DAY.find(after))
            .map(|m| m.as_str().to_string());

        let without_prefix = SCENE_PREFIXES
            .iter()
            .find_map(|p| heading.strip_prefix(p))
            .unwrap_or(heading);
        let without_prefix = without_prefix
            .strip_prefix("/EXT.")
            .or_else(|| without_prefix.strip_prefix("/INT."))
            .unwrap_or(without_prefix);
        let name = without_prefix
            .split('-')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();

        Self {
            name: if name.is_empty() {
                heading.to_string()
            } else {
                name
            },
            start_line,
            location,
            time_of_day,
        }
    }

    pub fn close(self, end_line: usize) -> Scene {
        Scene {
            name: self.name,
            start_line: self.start_line,
            end_line: end_line.max(self.start_line),
            location: self.location,
            time_of_day: self.time_of_day,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogueBuffer {
    pub fragments: Vec<String>,
    pub start_line: Option<usize>,
}

impl DialogueBuffer {
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    fn push(&mut self, fragment: &str, line_number: usize) {
        if self.fragments.is_empty() {
            self.start_line = Some(line_number);
        }
        self.fragments.push(fragment.to_string());
    }

    fn take(&mut self) -> Option<DialogueLine> {
        let start_line = self.start_line.take()?;
        let fragments = std::mem::take(&mut self.fragments);
        if fragments.is_empty() {
            return None;
        }
        let mut line = DialogueLine::new(fragments.join(" "), start_line);
        line.is_multi_line = fragments.len() > 1;
        Some(line)
    }
}

/// Something the parser produced while consuming a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEvent {
    CueDetected { name: String, line_number: usize },
    Dialogue { speaker: String, line: DialogueLine },
    SceneClosed(Scene),
}

/// Parser state: open scene, current speaker and buffered dialogue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserState {
    pub scene: Option<OpenScene>,
    pub speaker: Option<String>,
    pub buffer: DialogueBuffer,
}

impl ParserState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one line and returns the next state with the events it emitted.
    pub fn step(mut self, line: RawLine<'_>, is_action: bool) -> (Self, Vec<ParseEvent>) {
        let trimmed = line.content.trim();
        let number = line.absolute_line_number;
        let mut events = Vec::new();

        match classify_line(trimmed, is_action) {
            LineKind::Action => {
                self.flush_into(&mut events);
                self.speaker = None;
            }
            LineKind::SceneHeading => {
                self.flush_into(&mut events);
                if let Some(open) = self.scene.take() {
                    events.push(ParseEvent::SceneClosed(open.close(number.saturating_sub(1))));
                }
                self.scene = Some(OpenScene::from_heading(trimmed, number));
                self.speaker = None;
            }
            LineKind::CharacterCue => {
                self.flush_into(&mut events);
                self.speaker = Some(trimmed.to_string());
                self.buffer = DialogueBuffer::default();
                events.push(ParseEvent::CueDetected {
                    name: trimmed.to_string(),
                    line_number: number,
                });
            }
            LineKind::Text => {
                if self.speaker.is_some() {
                    self.buffer.push(trimmed, number);
                }
            }
            LineKind::Blank => {
                if self.speaker.is_some() && !self.buffer.is_empty() {
                    self.flush_into(&mut events);
                    self.speaker = None;
                }
            }
        }

        (self, events)
    }

    /// Ends a chunk: flushes buffered dialogue and closes the open scene at
    /// `last_line`. The speaker is carried into the next chunk so speech split
    /// by a chunk boundary stays with its character.
    pub fn finish_chunk(mut self, last_line: usize) -> (Self, Vec<ParseEvent>) {
        let mut events = Vec::new();
        self.flush_into(&mut events);
        if let Some(open) = self.scene.take() {
            events.push(ParseEvent::SceneClosed(open.close(last_line)));
        }
        (self, events)
    }

    fn flush_into(&mut self, events: &mut Vec<ParseEvent>) {
        let Some(line) = self.buffer.take() else {
            return;
        };
        if let Some(speaker) = &self.speaker {
            events.push(ParseEvent::Dialogue {
                speaker: speaker.clone(),
                line,
            });
        }
    }
}

/// Structured output of one chunk, not yet merged into the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkResult {
    pub start_line: usize,
    pub characters: Vec<Character>,
    pub scenes: Vec<Scene>,
    pub action_lines: Vec<ActionLine>,
}

impl ChunkResult {
    fn apply(&mut self, event: ParseEvent) {
        match event {
            ParseEvent::CueDetected { name, line_number } => {
                self.character_entry(&name, line_number);
            }
            ParseEvent::Dialogue { speaker, line } => {
                let line_number = line.line_number;
                self.character_entry(&speaker, line_number).push_dialogue(line);
            }
            ParseEvent::SceneClosed(scene) => self.scenes.push(scene),
        }
    }

    fn character_entry(&mut self, name: &str, line_number: usize) -> &mut Character {
        let key = character_key(name);
        let index = match self.characters.iter().position(|c| c.key() == key) {
            Some(index) => index,
            None => {
                self.characters.push(Character::new(name, line_number));
                self.characters.len() - 1
            }
        };
        let character = &mut self.characters[index];
        character.first_appearance = character.first_appearance.min(line_number);
        character
    }
}

/// Runs the state machine over one chunk. `action_lines` come from the
/// action-line classifier and are passed through to the result.
pub fn classify_chunk(
    chunk: &Chunk,
    action_lines: Vec<ActionLine>,
    carried: ParserState,
) -> (ChunkResult, ParserState) {
    let action_numbers: HashSet<usize> = action_lines.iter().map(|a| a.line_number).collect();
    let mut result = ChunkResult {
        start_line: chunk.start_line,
        ..ChunkResult::default()
    };

    let mut state = carried;
    for line in chunk.lines() {
        let is_action = action_numbers.contains(&line.absolute_line_number);
        let (next, events) = state.step(line, is_action);
        state = next;
        for event in events {
            result.apply(event);
        }
    }

    let (state, events) = state.finish_chunk(chunk.last_line());
    for event in events {
        result.apply(event);
    }

    result.action_lines = action_lines;
    (result, state)
}
