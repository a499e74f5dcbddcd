use crate::domain::Chunk;

/// Splits a script into line-aligned chunks small enough for the classifier.
pub trait TextSplitter: Send + Sync {
    fn split(&self, text: &str) -> Result<Vec<Chunk>, TextSplitterError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TextSplitterError {
    #[error("invalid chunk size: {0}")]
    InvalidChunkSize(usize),
}
