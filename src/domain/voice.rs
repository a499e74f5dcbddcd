use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Binary attribute predicted per character, selecting the voice pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceCategory {
    Male,
    Female,
}

impl VoiceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceCategory::Male => "male",
            VoiceCategory::Female => "female",
        }
    }
}

impl FromStr for VoiceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" | "man" => Ok(VoiceCategory::Male),
            "female" | "f" | "woman" => Ok(VoiceCategory::Female),
            other => Err(format!("Invalid voice category: {}", other)),
        }
    }
}

impl fmt::Display for VoiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceAssignment {
    pub voice_id: String,
    pub category: VoiceCategory,
    pub test_text: String,
}

/// Voice assignment per character name (display form).
pub type VoiceAssignments = BTreeMap<String, VoiceAssignment>;
