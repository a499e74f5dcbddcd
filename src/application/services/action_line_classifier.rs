use std::sync::Arc;

use serde_json::Value;

use crate::application::ports::{LlmClient, LlmClientError};
use crate::domain::{ActionLine, Chunk};
use super::strip_code_fence;

pub const ACTION_LINE_INSTRUCTIONS: &str = "You are analysing a screenplay excerpt. Every input \
line is prefixed with its absolute line number as \"<number>: <content>\". Return ONLY the lines \
that are action or stage-direction descriptions: not dialogue, not character names, not scene \
headings, not transitions. Respond with a JSON array of objects of the form \
{\"text\": \"<line content>\", \"lineNumber\": <number>} using the numbering given in the input. \
Respond with [] when there are none. Do not add commentary.";

/// Identifies action lines in a chunk through the text-classification collaborator.
pub struct ActionLineClassifier {
    llm_client: Arc<dyn LlmClient>,
}

impl ActionLineClassifier {
    pub fn new(llm_client: Arc<dyn LlmClient>) -> Self {
        Self { llm_client }
    }

    #[tracing::instrument(skip(self, chunk), fields(start_line = chunk.start_line))]
    pub async fn classify(&self, chunk: &Chunk) -> Result<Vec<ActionLine>, ClassificationError> {
        if chunk.text.is_empty() {
            return Err(ClassificationError::EmptyInput);
        }
        if chunk.text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let numbered = number_lines(chunk);
        let response = self
            .llm_client
            .complete(ACTION_LINE_INSTRUCTIONS, &numbered)
            .await?;

        let actions = parse_action_lines(&response, chunk.start_line, chunk.last_line())?;
        tracing::debug!(action_lines = actions.len(), "Chunk action lines classified");
        Ok(actions)
    }
}

/// Renders a chunk as `"{absolute line}: {content}"` lines.
pub fn number_lines(chunk: &Chunk) -> String {
    chunk
        .lines()
        .map(|line| format!("{}: {}", line.absolute_line_number, line.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parses and range-checks a classifier response.
///
/// The canonical entry shape is `{text, lineNumber}`; `{action, line}` is still
/// accepted from older prompt versions. Any malformed entry fails the whole
/// response.
pub fn parse_action_lines(
    response: &str,
    first_line: usize,
    last_line: usize,
) -> Result<Vec<ActionLine>, ClassificationError> {
    let payload = strip_code_fence(response);
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| ClassificationError::Format(format!("response is not valid JSON: {e}")))?;
    let entries = value
        .as_array()
        .ok_or_else(|| ClassificationError::Format("response is not a JSON array".to_string()))?;

    let mut actions = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let (text, line_number) = read_entry(entry).ok_or_else(|| {
            ClassificationError::Format(format!(
                "entry {index} must carry a string text and a non-negative integer lineNumber: {entry}"
            ))
        })?;

        if line_number < first_line as u64 || line_number > last_line as u64 {
            return Err(ClassificationError::OutOfRange {
                line_number,
                first_line,
                last_line,
            });
        }

        actions.push(ActionLine::new(text, line_number as usize));
    }

    Ok(actions)
}

fn read_entry(entry: &Value) -> Option<(&str, u64)> {
    let object = entry.as_object()?;
    let canonical = object.get("text").zip(object.get("lineNumber"));
    let (text, line) = canonical.or_else(|| object.get("action").zip(object.get("line")))?;
    Some((text.as_str()?, line.as_u64()?))
}

#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    #[error("chunk text is empty")]
    EmptyInput,
    #[error("malformed classification: {0}")]
    Format(String),
    #[error("line {line_number} is outside the chunk range {first_line}..={last_line}")]
    OutOfRange {
        line_number: u64,
        first_line: usize,
        last_line: usize,
    },
    #[error("classification service: {0}")]
    Service(#[from] LlmClientError),
}

impl ClassificationError {
    /// Service failures that must abort the job rather than skip the chunk.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ClassificationError::Service(e) if e.is_fatal())
    }
}
