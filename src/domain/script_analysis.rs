use serde::{Deserialize, Serialize};

use super::{ActionLine, Character, ProcessedLine, Scene, character_key};

/// Root aggregate built chunk by chunk and finalized once per job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptAnalysis {
    pub characters: Vec<Character>,
    pub scenes: Vec<Scene>,
    pub action_lines: Vec<ActionLine>,
    pub processed_lines: Vec<ProcessedLine>,
    pub metadata: AnalysisMetadata,
    /// Start line of the most recently merged chunk.
    #[serde(skip)]
    pub last_merged_start: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    pub total_lines: usize,
    /// Minutes.
    pub estimated_duration: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_chunks: Vec<SkippedChunk>,
}

/// A chunk whose classification failed and was left out of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedChunk {
    pub chunk_index: usize,
    pub start_line: usize,
    pub error: String,
}

impl ScriptAnalysis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn character(&self, name: &str) -> Option<&Character> {
        let key = character_key(name);
        self.characters.iter().find(|c| c.key() == key)
    }

    pub fn character_mut(&mut self, name: &str) -> Option<&mut Character> {
        let key = character_key(name);
        self.characters.iter_mut().find(|c| c.key() == key)
    }

    pub fn dialogue_line_count(&self) -> usize {
        self.characters.iter().map(|c| c.lines).sum()
    }
}
