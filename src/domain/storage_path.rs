use std::fmt;

use super::ScriptId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath(String);

impl StoragePath {
    /// Location of the uploaded source file.
    pub fn upload(script_id: &ScriptId, filename: &str) -> Self {
        Self(format!("{}/upload/{}", script_id, sanitize_segment(filename)))
    }

    /// Location of synthesized audio for one character and voice.
    pub fn audio(script_id: &ScriptId, character: &str, voice_id: &str, clip: &str) -> Self {
        Self(format!(
            "{}/audio/{}/{}/{}.mp3",
            script_id,
            sanitize_segment(&character.to_lowercase()),
            sanitize_segment(voice_id),
            sanitize_segment(clip)
        ))
    }

    pub fn from_raw(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn sanitize_segment(segment: &str) -> String {
    let cleaned: String = segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "_".to_string()
    } else {
        cleaned
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
