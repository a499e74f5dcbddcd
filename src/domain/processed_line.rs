use serde::{Deserialize, Serialize};

use super::VoiceUrls;

/// `character_id` used for stage directions in the flattened view.
pub const ACTION_CHARACTER_ID: &str = "ACTION";
pub const ACTION_CHARACTER_NAME: &str = "Action";

/// One entry of the final, ordered document spanning dialogue and action lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedLine {
    pub character_id: String,
    pub character_name: String,
    pub text: String,
    pub original_line_number: usize,
    pub sequential_number: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_action: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_user: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voices: Option<VoiceUrls>,
}

impl ProcessedLine {
    pub fn is_action(&self) -> bool {
        self.is_action.unwrap_or(false)
    }
}
