use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Audio rendition urls keyed by voice id.
pub type VoiceUrls = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueLine {
    pub text: String,
    pub line_number: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequential_number: Option<usize>,
    /// Set when the entry was assembled from more than one source line.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_multi_line: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voices: Option<VoiceUrls>,
}

impl DialogueLine {
    pub fn new(text: impl Into<String>, line_number: usize) -> Self {
        Self {
            text: text.into(),
            line_number,
            sequential_number: None,
            is_multi_line: false,
            voices: None,
        }
    }
}

/// A speaking character. Identity is the lowercased `name`; `name` keeps the
/// casing it was first seen with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub name: String,
    pub lines: usize,
    pub first_appearance: usize,
    pub dialogue: Vec<DialogueLine>,
}

impl Character {
    pub fn new(name: impl Into<String>, first_appearance: usize) -> Self {
        Self {
            name: name.into(),
            lines: 0,
            first_appearance,
            dialogue: Vec::new(),
        }
    }

    pub fn key(&self) -> String {
        character_key(&self.name)
    }

    pub fn push_dialogue(&mut self, line: DialogueLine) {
        self.dialogue.push(line);
        self.lines = self.dialogue.len();
    }

    pub fn first_line_text(&self) -> Option<&str> {
        self.dialogue.first().map(|d| d.text.as_str())
    }
}

/// Case-insensitive identity key for character names.
pub fn character_key(name: &str) -> String {
    name.trim().to_lowercase()
}
