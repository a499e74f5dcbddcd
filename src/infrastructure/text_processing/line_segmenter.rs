use crate::application::ports::{TextSplitter, TextSplitterError};
use crate::domain::Chunk;

/// Line-aligned segmenter. Chunks never exceed `max_chunk_size` characters and
/// only break inside a line when that line alone is larger than the limit.
pub struct LineSegmenter {
    max_chunk_size: usize,
}

impl LineSegmenter {
    pub fn new(max_chunk_size: usize) -> Result<Self, TextSplitterError> {
        if max_chunk_size == 0 {
            return Err(TextSplitterError::InvalidChunkSize(max_chunk_size));
        }
        Ok(Self { max_chunk_size })
    }
}

impl TextSplitter for LineSegmenter {
    fn split(&self, text: &str) -> Result<Vec<Chunk>, TextSplitterError> {
        Ok(segment(text, self.max_chunk_size))
    }
}

/// Splits `text` on the last newline within `max_chunk_size` characters of each
/// chunk start. The newline at the boundary is consumed; when no newline exists
/// in the window the chunk is cut at the hard character limit instead.
pub fn segment(text: &str, max_chunk_size: usize) -> Vec<Chunk> {
    let max_chunk_size = max_chunk_size.max(1);
    let mut chunks = Vec::new();
    let mut rest = text;
    let mut line = 0;

    while !rest.is_empty() {
        // The window holds one char past the limit so that a newline sitting
        // exactly at the limit still counts as a boundary.
        let window_end = match rest.char_indices().nth(max_chunk_size + 1) {
            Some((byte, _)) => byte,
            None => rest.len(),
        };

        if window_end == rest.len() && rest.chars().count() <= max_chunk_size {
            chunks.push(Chunk::new(rest.to_string(), line, false));
            break;
        }

        let window = &rest[..window_end];
        match window.rfind('\n') {
            Some(newline) => {
                let piece = &rest[..newline];
                chunks.push(Chunk::new(piece.to_string(), line, true));
                line += piece.matches('\n').count() + 1;
                rest = &rest[newline + 1..];
            }
            None => {
                let cut = rest
                    .char_indices()
                    .nth(max_chunk_size)
                    .map(|(byte, _)| byte)
                    .unwrap_or(rest.len());
                chunks.push(Chunk::new(rest[..cut].to_string(), line, false));
                rest = &rest[cut..];
            }
        }
    }

    chunks
}

/// Inverse of [`segment`]: re-inserts the consumed newlines.
pub fn reassemble(chunks: &[Chunk]) -> String {
    let mut text = String::new();
    for chunk in chunks {
        text.push_str(&chunk.text);
        if chunk.ends_with_break {
            text.push('\n');
        }
    }
    text
}
